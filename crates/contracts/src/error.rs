//! Layered error definitions
//!
//! Categorized by source: protocol / schema / flush / config

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type
///
/// Every variant is fatal for a run: nothing is recovered locally.
#[derive(Debug, Error)]
pub enum TargetError {
    // ===== Protocol Errors =====
    /// Malformed input line or unrecognized message kind
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// RECORD seen while no stream is active
    #[error("a record for stream '{stream}' was encountered before a corresponding schema")]
    RecordBeforeSchema { stream: String },

    /// RECORD for a stream other than the active one
    #[error("record for stream '{stream}' received while stream '{active}' is active")]
    OutOfOrderStream { active: String, stream: String },

    // ===== Schema Errors =====
    /// Declared type has no column mapping
    #[error("unsupported type '{type_name}' for field '{field}'")]
    UnsupportedType { field: String, type_name: String },

    /// Buffered value cannot be cast to its column type
    #[error("stream '{stream}': cannot coerce value {value} in field '{field}' at row {row}")]
    SchemaCoercion {
        stream: String,
        field: String,
        row: usize,
        value: String,
    },

    // ===== Flush Errors =====
    /// Codec not supported by the file writer
    #[error("compression method '{method}' is not supported by the parquet writer")]
    CompressionUnsupported { method: String },

    /// Filesystem failure
    #[error("io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Columnar encoder failure
    #[error("failed to encode stream '{stream}': {message}")]
    Encode { stream: String, message: String },

    /// Checkpoint channel failure
    #[error("failed to emit checkpoint: {0}")]
    Output(#[source] std::io::Error),

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },
}

impl TargetError {
    /// Create protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create unsupported type error
    pub fn unsupported_type(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create coercion error
    pub fn coercion(
        stream: impl Into<String>,
        field: impl Into<String>,
        row: usize,
        value: impl Into<String>,
    ) -> Self {
        Self::SchemaCoercion {
            stream: stream.into(),
            field: field.into(),
            row,
            value: value.into(),
        }
    }

    /// Create io error bound to a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create encoder error
    pub fn encode(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
