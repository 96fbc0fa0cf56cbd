//! Snapshot stdio driver.
//!
//! Reads one JSON command per line from stdin and writes every outbound
//! event to stdout as one JSON line. Logs go to stderr.
//!
//! ```text
//! {"session": 1, "channel": "snapshot/default/perPage", "args": [10]}
//! {"session": 1, "close": true}
//! ```
//!
//! A client session is opened the first time its id is seen and receives
//! the collection given with `--collection`.

mod driver;

use anyhow::{Context, Result};
use clap::Parser;
use driver::Driver;
use snapshot_core::Record;
use snapshot_session::SessionConfig;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "snapshot")]
#[command(about = "Serve paged, filtered views of a JSON collection over stdio")]
struct Args {
    /// JSON array of records loaded into every session
    #[arg(short, long, value_name = "PATH")]
    collection: Option<PathBuf>,

    /// JSON session configuration
    #[arg(long, value_name = "PATH", env = "SNAPSHOT_CONFIG")]
    config: Option<PathBuf>,

    /// Fields to index, comma separated (default: fields of the first record)
    #[arg(short, long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Primary key field (default: first indexed field)
    #[arg(long)]
    primary_key: Option<String>,

    /// Build dimensions one per tick instead of all at load
    #[arg(long)]
    defer: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let config = load_config(&args)?;
    let collection = match &args.collection {
        Some(path) => Some(load_collection(path)?),
        None => None,
    };
    tracing::info!(
        namespace = %config.namespace,
        prefix = %config.prefix,
        records = collection.as_ref().map_or(0, |c| c.len()),
        "snapshot driver started"
    );

    let mut driver = Driver::new(config, collection);
    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = driver.handle_line(&line) {
            tracing::warn!(line = number + 1, error = %err, "command skipped");
        }
        driver.tick();
    }
    driver.drain();
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SessionConfig::default(),
    }
    .with_env_overrides();

    if !args.keys.is_empty() {
        config.keys = Some(args.keys.clone());
    }
    if let Some(primary_key) = &args.primary_key {
        config.primary_key = Some(primary_key.clone());
    }
    if args.defer {
        config.defer_indexing = true;
    }
    Ok(config)
}

fn load_collection(path: &Path) -> Result<Arc<[Record]>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read collection {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("collection {} is not an array of flat objects", path.display()))?;
    Ok(records.into())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("snapshot=debug")
        } else {
            EnvFilter::new("snapshot=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
