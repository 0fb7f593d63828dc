//! # target-parquet
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading, CLI overrides and validation
//! - The Singer target run over stdin / stdout
//! - Logging to stderr so stdout stays reserved for the checkpoint

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_target, run_validate};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "target-parquet starting");

    // Execute command
    let result = match &cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        None => run_target(&cli.run).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = format!("{e:#}"), "Command failed");
    }

    result
}

/// Initialize logging and metrics based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.run.metrics_port != 0).then_some(cli.run.metrics_port),
        default_log_level: default_log_level.to_string(),
        ignore_env: cli.quiet,
    })
}
