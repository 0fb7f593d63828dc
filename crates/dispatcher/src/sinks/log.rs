//! LogSink - logs flush summaries via tracing

use contracts::{BatchSink, FlushBatch, TargetError};
use tracing::{debug, info, instrument};

/// Sink that only logs what would be written (dry run)
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BatchSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, batch),
        fields(sink = %self.name, stream = %batch.stream)
    )]
    async fn write(&mut self, batch: FlushBatch) -> Result<bool, TargetError> {
        if batch.is_empty() {
            debug!("Empty flush, nothing would be written");
            return Ok(false);
        }

        info!(
            rows = batch.rows.len(),
            columns = batch.layout.len(),
            path = %batch.path.display(),
            compression = %batch.compression,
            "Flush received (dry run)"
        );
        Ok(false)
    }
}
