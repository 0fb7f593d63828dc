//! BatchSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks that receive flushed stream buffers.

use std::path::PathBuf;

use crate::{ColumnLayout, Compression, Record, TargetError};

/// One flush of a stream buffer
#[derive(Debug, Clone, PartialEq)]
pub struct FlushBatch {
    /// Stream the rows belong to
    pub stream: String,
    /// Buffered records, in arrival order
    pub rows: Vec<Record>,
    /// Column types derived from the active schema
    pub layout: ColumnLayout,
    /// Fully resolved destination file
    pub path: PathBuf,
    /// Codec requested for the file
    pub compression: Compression,
}

impl FlushBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Data output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(BatchSink: Send)]
pub trait LocalBatchSink {
    /// Sink name (used for logging)
    fn name(&self) -> &str;

    /// Write one flushed batch
    ///
    /// Returns whether a file was produced. An empty batch is a no-op and must
    /// not produce a file.
    ///
    /// # Errors
    /// Returns coercion / codec / io errors (should include context)
    async fn write(&mut self, batch: FlushBatch) -> Result<bool, TargetError>;
}
