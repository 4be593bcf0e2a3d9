use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging for internal details
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a queue under a freshly allocated name and print the name
    New {
        /// Name prefix (defaults to naming.prefix from the config)
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Append items to the end of a queue
    Push {
        #[arg(long)]
        name: String,
        /// Items as JSON values; anything that is not valid JSON is taken as a string
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Prepend items to the beginning of a queue
    Unshift {
        #[arg(long)]
        name: String,
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Remove and print the last item
    Pop {
        #[arg(long)]
        name: String,
        /// Fail instead of waiting when the queue is empty
        #[arg(long)]
        non_blocking: bool,
    },
    /// Remove and print the first item
    Shift {
        #[arg(long)]
        name: String,
        #[arg(long)]
        non_blocking: bool,
    },
    /// Print the number of items in a queue
    Len {
        #[arg(long)]
        name: String,
    },
    /// Print whether a queue is empty
    Empty {
        #[arg(long)]
        name: String,
    },
    /// Discard every item in a queue
    Clear {
        #[arg(long)]
        name: String,
    },
    /// List store keys matching a glob pattern
    Keys {
        #[arg(default_value = "*")]
        pattern: String,
    },
}
