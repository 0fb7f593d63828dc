//! Run metrics
//!
//! Counters emitted through the `metrics` facade. Without an installed
//! recorder (the default) they are no-ops.

use metrics::counter;

/// One protocol message consumed
pub fn record_message(kind: &'static str) {
    counter!("target_parquet_messages_total", "kind" => kind).increment(1);
}

/// One record buffered for `stream`
pub fn record_buffered(stream: &str) {
    counter!("target_parquet_records_total", "stream" => stream.to_string()).increment(1);
}

/// One flush of `stream`, empty or not
pub fn record_flush(stream: &str) {
    counter!("target_parquet_flushes_total", "stream" => stream.to_string()).increment(1);
}

/// One file written for `stream`
pub fn record_file_written(stream: &str, rows: usize) {
    counter!("target_parquet_files_written_total", "stream" => stream.to_string()).increment(1);
    counter!("target_parquet_rows_written_total", "stream" => stream.to_string())
        .increment(rows as u64);
}
