//! Default command: run the target over stdin / stdout.

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{info, warn};

use columnar::Flatten;
use config_loader::{ConfigLoader, TargetConfig};
use contracts::{BatchSink, RecordTransform};
use dispatcher::{Dispatcher, Driver, LogSink, OutputLayout, ParquetSink, RunSummary};

use super::validate::collect_warnings;
use crate::cli::RunArgs;

/// Execute the target
pub async fn run_target(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;

    info!(
        destination = %config.destination_path.display(),
        partition = config.destination_partition_path.as_deref().unwrap_or_default(),
        file_name = config.file_name.as_deref().unwrap_or_default(),
        compression = %config.compression(),
        flatten = config.flatten_records,
        "Configuration loaded"
    );
    for warning in collect_warnings(&config) {
        warn!("{warning}");
    }

    if config.disable_collection {
        info!("Usage collection disabled");
    } else {
        // Detached: never awaited, never able to fail the run
        let _ = observability::spawn_usage_notification(env!("CARGO_PKG_VERSION"));
    }

    let layout = OutputLayout::from_config(&config);
    let transform = config.flatten_records.then(|| {
        Box::new(Flatten::new(config.flatten_separator.clone())) as Box<dyn RecordTransform>
    });

    let summary = if args.dry_run {
        info!("Dry run mode - flushes are logged, no files are written");
        drive(LogSink::new("dry_run"), layout, transform).await?
    } else {
        drive(ParquetSink::default(), layout, transform).await?
    };

    info!(
        messages = summary.stats.messages,
        records = summary.stats.records,
        flushes = summary.stats.flushes,
        files = summary.stats.files_written,
        rows = summary.stats.rows_written,
        checkpoint = summary.checkpoint.is_some(),
        duration_secs = summary.stats.elapsed().as_secs_f64(),
        "Target finished"
    );
    Ok(())
}

async fn drive<S: BatchSink>(
    sink: S,
    layout: OutputLayout,
    transform: Option<Box<dyn RecordTransform>>,
) -> Result<RunSummary> {
    let mut dispatcher = Dispatcher::new(sink, layout);
    if let Some(transform) = transform {
        info!(transform = transform.name(), "Record transform enabled");
        dispatcher = dispatcher.with_transform(transform);
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    Driver::new(dispatcher)
        .run(input, &mut output)
        .await
        .context("Target run failed")
}

/// Load the config file (if any), then apply CLI overrides and re-validate
fn load_config(args: &RunArgs) -> Result<TargetConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            let destination = args
                .destination_path
                .clone()
                .context("either --config or --destination-path is required")?;
            TargetConfig::new(destination)
        }
    };

    apply_overrides(&mut config, args);
    config_loader::validate(&config).context("Invalid configuration after CLI overrides")?;
    Ok(config)
}

fn apply_overrides(config: &mut TargetConfig, args: &RunArgs) {
    if let Some(ref destination) = args.destination_path {
        info!(destination = %destination.display(), "Overriding destination path from CLI");
        config.destination_path = destination.clone();
    }
    if let Some(ref partition) = args.partition_path {
        info!(partition = %partition, "Overriding partition path from CLI");
        config.destination_partition_path = Some(partition.clone());
    }
    if let Some(ref file_name) = args.file_name {
        info!(file_name = %file_name, "Overriding file name from CLI");
        config.file_name = Some(file_name.clone());
    }
    if let Some(compression) = args.compression {
        info!(compression = %compression, "Overriding compression method from CLI");
        config.compression_method = Some(compression);
    }
}
