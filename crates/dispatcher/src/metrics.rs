//! Run statistics for the summary
//!
//! Plain counters owned by the dispatcher; the `metrics` facade counters in
//! `observability::metrics` are emitted alongside them.

use std::time::{Duration, Instant};

/// Counters of one run
#[derive(Debug, Clone)]
pub struct DispatchStats {
    started: Instant,
    /// Protocol messages handled
    pub messages: u64,
    /// `SCHEMA` messages handled
    pub schemas: u64,
    /// `RECORD` messages buffered
    pub records: u64,
    /// `STATE` messages handled
    pub states: u64,
    /// Flushes issued to the sink, empty ones included
    pub flushes: u64,
    /// Files the sink reports as written
    pub files_written: u64,
    /// Rows in those files
    pub rows_written: u64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            messages: 0,
            schemas: 0,
            records: 0,
            states: 0,
            flushes: 0,
            files_written: 0,
            rows_written: 0,
        }
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn record_flush(&mut self, rows: usize, written: bool) {
        self.flushes += 1;
        if written {
            self.files_written += 1;
            self.rows_written += rows as u64;
        }
    }
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self::new()
    }
}
