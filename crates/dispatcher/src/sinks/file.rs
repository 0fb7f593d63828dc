//! ParquetSink - writes each flushed batch to one Parquet file

use std::fs::{self, File};

use columnar::build_batch;
use contracts::{BatchSink, Compression, FlushBatch, TargetError};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression as Codec, GzipLevel};
use parquet::file::properties::WriterProperties;
use tracing::{debug, info, instrument};

/// Sink that writes Parquet files to the resolved batch path
pub struct ParquetSink {
    name: String,
}

impl ParquetSink {
    /// Create a new ParquetSink
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ParquetSink {
    fn default() -> Self {
        Self::new("parquet")
    }
}

/// Page codec for a configured compression method
///
/// `None` keeps the writer's usual Snappy pages.
fn writer_properties(compression: Compression) -> Result<WriterProperties, TargetError> {
    let codec = match compression {
        Compression::None => Codec::SNAPPY,
        Compression::Gzip => Codec::GZIP(GzipLevel::default()),
        Compression::Bz2 | Compression::Zip | Compression::Xz => {
            return Err(TargetError::CompressionUnsupported {
                method: compression.to_string(),
            });
        }
    };

    Ok(WriterProperties::builder().set_compression(codec).build())
}

fn write_file(batch: &FlushBatch) -> Result<(), TargetError> {
    // Codec and coercion failures must not leave a file behind
    let props = writer_properties(batch.compression)?;
    let record_batch = build_batch(&batch.stream, &batch.rows, &batch.layout)?;

    if let Some(parent) = batch.path.parent() {
        fs::create_dir_all(parent).map_err(|e| TargetError::io(parent, e))?;
    }
    let file = File::create(&batch.path).map_err(|e| TargetError::io(&batch.path, e))?;

    let mut writer = ArrowWriter::try_new(file, record_batch.schema(), Some(props))
        .map_err(|e| TargetError::encode(&batch.stream, format!("parquet writer init failed: {e}")))?;
    writer
        .write(&record_batch)
        .map_err(|e| TargetError::encode(&batch.stream, format!("parquet write failed: {e}")))?;
    writer
        .close()
        .map_err(|e| TargetError::encode(&batch.stream, format!("parquet close failed: {e}")))?;

    Ok(())
}

impl BatchSink for ParquetSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "parquet_sink_write",
        skip(self, batch),
        fields(
            sink = %self.name,
            stream = %batch.stream,
            rows = batch.rows.len(),
            path = %batch.path.display()
        )
    )]
    async fn write(&mut self, batch: FlushBatch) -> Result<bool, TargetError> {
        if batch.is_empty() {
            debug!("Empty flush, no file written");
            return Ok(false);
        }

        write_file(&batch)?;

        observability::metrics::record_file_written(&batch.stream, batch.rows.len());
        info!(compression = %batch.compression, "Parquet file written");
        Ok(true)
    }
}
