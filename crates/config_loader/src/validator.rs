//! Config validation
//!
//! Rules:
//! - destination_path is non-empty
//! - file_name, when set, is a bare non-empty file name
//! - destination_partition_path does not escape the stream directory
//! - flatten_separator is non-empty when flattening is enabled

use std::path::{Component, Path};

use contracts::{TargetConfig, TargetError};

/// Validate a TargetConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &TargetConfig) -> Result<(), TargetError> {
    validate_destination(config)?;
    validate_file_name(config)?;
    validate_partition_path(config)?;
    validate_flatten(config)?;
    Ok(())
}

fn validate_destination(config: &TargetConfig) -> Result<(), TargetError> {
    if config.destination_path.as_os_str().is_empty() {
        return Err(TargetError::config_validation(
            "destination_path",
            "destination_path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_file_name(config: &TargetConfig) -> Result<(), TargetError> {
    let Some(name) = config.file_name.as_deref() else {
        return Ok(());
    };
    if name.is_empty() {
        return Err(TargetError::config_validation(
            "file_name",
            "file_name cannot be empty",
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(TargetError::config_validation(
            "file_name",
            format!("file_name '{name}' must not contain a path separator"),
        ));
    }
    Ok(())
}

fn validate_partition_path(config: &TargetConfig) -> Result<(), TargetError> {
    let Some(partition) = config.destination_partition_path.as_deref() else {
        return Ok(());
    };
    if Path::new(partition)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(TargetError::config_validation(
            "destination_partition_path",
            format!("partition path '{partition}' must not contain '..'"),
        ));
    }
    Ok(())
}

fn validate_flatten(config: &TargetConfig) -> Result<(), TargetError> {
    if config.flatten_records && config.flatten_separator.is_empty() {
        return Err(TargetError::config_validation(
            "flatten_separator",
            "flatten_separator cannot be empty when flatten_records is set",
        ));
    }
    Ok(())
}
