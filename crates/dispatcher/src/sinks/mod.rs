//! Sink implementations
//!
//! Contains ParquetSink, LogSink (dry run), and RecordingSink (test double).

mod file;
mod log;
mod recording;

pub use self::file::ParquetSink;
pub use self::log::LogSink;
pub use self::recording::RecordingSink;
