//! Csvpress Worker - batch normalization harness

use anyhow::{Context, Result};
use clap::Parser;
use csvpress_common::logging::{init_logging, LogConfig, LogLevel};
use csvpress_worker::storage::S3Store;
use csvpress_worker::{handle_event, SqsEvent, WorkerConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "csvpress-worker")]
#[command(author, version, about = "CSV normalization batch worker")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Process one SQS event document and print the batch outcome
    Process {
        /// Path to a JSON file containing the SQS event
        #[arg(short, long)]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // LOG_LEVEL takes precedence over the flag
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    if cli.verbose && std::env::var("LOG_LEVEL").is_err() {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    match cli.command {
        Command::Process { event } => {
            let config = WorkerConfig::from_env()?;
            let store = S3Store::from_env().await;

            let raw = std::fs::read_to_string(&event)
                .with_context(|| format!("Failed to read event file {}", event.display()))?;
            let event: SqsEvent =
                serde_json::from_str(&raw).context("Event file is not a valid SQS event")?;

            info!(messages = event.records.len(), "Loaded SQS event");

            let response = handle_event(event, &store, &config).await;

            // The batch response is the program's output, not a log line.
            println!("{}", serde_json::to_string(&response)?);
        },
    }

    Ok(())
}
