//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::Compression;
use std::path::PathBuf;

/// target-parquet - Singer target writing one Parquet file per stream flush
#[derive(Parser, Debug)]
#[command(
    name = "target-parquet",
    author,
    version,
    about = "Singer target that writes streams to Parquet files",
    long_about = "Reads Singer SCHEMA / RECORD / STATE messages from stdin, buffers the \n\
                  active stream and writes it to Parquet under \n\
                  <destination>/<stream>[/<partition>]/. The last STATE value is \n\
                  written to stdout once all input has been flushed."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TARGET_PARQUET_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs always go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "TARGET_PARQUET_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands (default: run the target)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file without reading input
    Validate(ValidateArgs),
}

/// Arguments for running the target
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (JSON or TOML)
    #[arg(short, long, env = "TARGET_PARQUET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override destination root directory
    #[arg(long, env = "TARGET_PARQUET_DESTINATION_PATH")]
    pub destination_path: Option<PathBuf>,

    /// Override partition sub-path below each stream directory
    #[arg(long)]
    pub partition_path: Option<String>,

    /// Override fixed output file name
    #[arg(long)]
    pub file_name: Option<String>,

    /// Override compression method (none, gzip, bz2, zip, xz)
    #[arg(long, value_parser = parse_compression)]
    pub compression: Option<Compression>,

    /// Log every flush instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TARGET_PARQUET_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

fn parse_compression(name: &str) -> Result<Compression, String> {
    Compression::from_name(name)
        .ok_or_else(|| format!("unknown compression method '{name}' (expected none, gzip, bz2, zip or xz)"))
}
