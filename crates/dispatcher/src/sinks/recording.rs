//! RecordingSink - in-memory test double
//!
//! Captures every batch it is handed, empty ones included, so flush counts and
//! paths can be asserted exactly. Clones share the same capture. Every
//! non-empty batch is reported as a written file.

use std::sync::{Arc, Mutex, PoisonError};

use contracts::{BatchSink, FlushBatch, TargetError};

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    batches: Arc<Mutex<Vec<FlushBatch>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch received so far, in call order
    pub fn batches(&self) -> Vec<FlushBatch> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BatchSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn write(&mut self, batch: FlushBatch) -> Result<bool, TargetError> {
        let written = !batch.is_empty();
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(batch);
        Ok(written)
    }
}
