//! Command execution against the configured file store

use super::args::Commands;
use crate::config::Config;
use crate::error::QueueError;
use crate::queue::Queue;
use crate::store::{FileStore, ListStore};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::time::Duration;
use tokio::signal;
use tokio::time::interval;
use tracing::debug;

type CliQueue = Queue<Value, FileStore>;

/// How often a waiting pop/shift re-checks the store
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
enum Take {
    Pop,
    Shift,
}

/// Run one command and return the text to print
pub async fn run_command(command: Commands, config: &Config) -> Result<String> {
    let store = FileStore::new(&config.store.path);
    debug!("Using store file: {}", store.file_path().display());

    match command {
        Commands::New { prefix } => {
            let prefix = prefix.unwrap_or_else(|| config.naming.prefix.clone());
            let queue: CliQueue = Queue::with_prefix(store, &prefix)?;
            Ok(queue.name().to_string())
        }
        Commands::Push { name, items } => {
            let queue = open(store, &name)?;
            queue.push(parse_items(&items))?;
            Ok(queue.length()?.to_string())
        }
        Commands::Unshift { name, items } => {
            let queue = open(store, &name)?;
            queue.unshift(parse_items(&items))?;
            Ok(queue.length()?.to_string())
        }
        Commands::Pop { name, non_blocking } => {
            take(open(store, &name)?, Take::Pop, non_blocking).await
        }
        Commands::Shift { name, non_blocking } => {
            take(open(store, &name)?, Take::Shift, non_blocking).await
        }
        Commands::Len { name } => Ok(open(store, &name)?.length()?.to_string()),
        Commands::Empty { name } => Ok(open(store, &name)?.empty()?.to_string()),
        Commands::Clear { name } => {
            open(store, &name)?.clear()?;
            Ok(format!("Cleared {}", name))
        }
        Commands::Keys { pattern } => Ok(store.keys(&pattern)?.join("\n")),
    }
}

fn open(store: FileStore, name: &str) -> Result<CliQueue> {
    Queue::named(store, name).with_context(|| format!("Failed to open queue: {}", name))
}

/// Parse each argument as JSON, keeping it as a plain string when that fails
fn parse_items(items: &[String]) -> Vec<Value> {
    items
        .iter()
        .map(|item| serde_json::from_str(item).unwrap_or_else(|_| Value::String(item.clone())))
        .collect()
}

async fn take(queue: CliQueue, which: Take, non_blocking: bool) -> Result<String> {
    let take_one = |queue: &CliQueue| match which {
        Take::Pop => queue.pop(true),
        Take::Shift => queue.shift(true),
    };

    let item = if non_blocking {
        take_one(&queue).map_err(|e| match e {
            QueueError::Empty => anyhow!("Queue {} is empty", queue.name()),
            other => other.into(),
        })?
    } else {
        // Pushes from other runs cannot signal this process, so poll the store
        let mut ticker = interval(POLL_INTERVAL);
        let interrupted = signal::ctrl_c();
        tokio::pin!(interrupted);

        loop {
            tokio::select! {
                _ = ticker.tick() => match take_one(&queue) {
                    Ok(item) => break item,
                    Err(QueueError::Empty) => continue,
                    Err(e) => return Err(e.into()),
                },
                _ = &mut interrupted => {
                    bail!("Interrupted while waiting on queue {}", queue.name());
                }
            }
        }
    };

    Ok(serde_json::to_string(&item)?)
}
