//! # Dispatcher
//!
//! Stream dispatch module.
//!
//! Responsibilities:
//! - Drive the `SCHEMA` / `RECORD` / `STATE` state machine
//! - Buffer the active stream and flush it on stream switch and end of input
//! - Resolve output paths and hand batches to a `BatchSink`
//! - Track the last checkpoint and emit it once the run succeeds

pub mod buffer;
pub mod dispatcher;
pub mod driver;
pub mod layout;
pub mod metrics;
pub mod sinks;

pub use buffer::StreamBuffer;
pub use contracts::{BatchSink, Checkpoint, FlushBatch};
pub use dispatcher::{Dispatcher, RunSummary};
pub use driver::Driver;
pub use layout::OutputLayout;
pub use metrics::DispatchStats;
pub use sinks::{LogSink, ParquetSink, RecordingSink};
