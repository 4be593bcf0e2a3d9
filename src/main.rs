use anyhow::Result;
use clap::Parser;
use list_queue::cli::{run_command, Cli};
use list_queue::config::{Config, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(PathBuf::from(DEFAULT_CONFIG_PATH))?,
    };

    let output = run_command(cli.command, &config).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
