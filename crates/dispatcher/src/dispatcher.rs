//! Dispatcher - stream state machine
//!
//! Only one stream is active at a time. A `SCHEMA` for another stream flushes
//! the active buffer before switching; end of input flushes it once more.

use tracing::{debug, info, instrument};

use columnar::map_schema;
use contracts::{
    BatchSink, Checkpoint, FlushBatch, Message, RecordMessage, RecordTransform, SchemaMessage,
    StateMessage, TargetError,
};

use crate::buffer::StreamBuffer;
use crate::layout::OutputLayout;
use crate::metrics::DispatchStats;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Value of the last `STATE` message, if any
    pub checkpoint: Option<Checkpoint>,
    pub stats: DispatchStats,
}

/// Routes messages into the active stream buffer and flushes it to a sink
pub struct Dispatcher<S> {
    sink: S,
    layout: OutputLayout,
    active: Option<StreamBuffer>,
    checkpoint: Option<Checkpoint>,
    transform: Option<Box<dyn RecordTransform>>,
    stats: DispatchStats,
}

impl<S: BatchSink> Dispatcher<S> {
    pub fn new(sink: S, layout: OutputLayout) -> Self {
        Self {
            sink,
            layout,
            active: None,
            checkpoint: None,
            transform: None,
            stats: DispatchStats::new(),
        }
    }

    /// Apply `transform` to every record before it is buffered
    pub fn with_transform(mut self, transform: Box<dyn RecordTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Name of the stream currently accepting records
    pub fn active_stream(&self) -> Option<&str> {
        self.active.as_ref().map(StreamBuffer::stream)
    }

    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoint.as_ref()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Handle one message in arrival order
    ///
    /// # Errors
    /// - `RecordBeforeSchema` / `OutOfOrderStream` for ordering violations
    /// - `UnsupportedType` when a schema cannot be mapped
    /// - any sink error raised by a flush
    #[instrument(
        name = "dispatcher_handle",
        skip(self, message),
        fields(kind = message.kind(), stream = message.stream().unwrap_or_default())
    )]
    pub async fn handle(&mut self, message: Message) -> Result<(), TargetError> {
        self.stats.messages += 1;
        observability::metrics::record_message(message.kind());

        match message {
            Message::State(state) => {
                self.handle_state(state);
                Ok(())
            }
            Message::Schema(schema) => self.handle_schema(schema).await,
            Message::Record(record) => self.handle_record(record),
        }
    }

    /// Flush the active stream (even when empty) and return the run summary
    #[instrument(name = "dispatcher_finish", skip(self))]
    pub async fn finish(mut self) -> Result<RunSummary, TargetError> {
        self.flush_active().await?;

        info!(
            messages = self.stats.messages,
            records = self.stats.records,
            flushes = self.stats.flushes,
            files = self.stats.files_written,
            has_checkpoint = self.checkpoint.is_some(),
            "Dispatcher finished"
        );

        Ok(RunSummary {
            checkpoint: self.checkpoint,
            stats: self.stats,
        })
    }

    fn handle_state(&mut self, state: StateMessage) {
        self.stats.states += 1;
        if state.value.is_null() {
            debug!("Checkpoint cleared");
            self.checkpoint = None;
        } else {
            debug!("Checkpoint updated");
            self.checkpoint = Some(Checkpoint(state.value));
        }
    }

    async fn handle_schema(&mut self, message: SchemaMessage) -> Result<(), TargetError> {
        self.stats.schemas += 1;
        let layout = map_schema(&message.schema)?;

        if let Some(buffer) = self
            .active
            .as_mut()
            .filter(|buffer| buffer.stream() == message.stream)
        {
            debug!(stream = %message.stream, "Schema re-announced for active stream");
            buffer.set_schema(message.schema, layout);
            return Ok(());
        }
        self.flush_active().await?;

        info!(stream = %message.stream, columns = layout.len(), "Stream activated");
        self.active = Some(StreamBuffer::new(message.stream, message.schema, layout));
        Ok(())
    }

    fn handle_record(&mut self, message: RecordMessage) -> Result<(), TargetError> {
        let buffer = match &mut self.active {
            None => {
                return Err(TargetError::RecordBeforeSchema {
                    stream: message.stream,
                });
            }
            Some(buffer) if buffer.stream() != message.stream => {
                return Err(TargetError::OutOfOrderStream {
                    active: buffer.stream().to_string(),
                    stream: message.stream,
                });
            }
            Some(buffer) => buffer,
        };

        let record = match &self.transform {
            Some(transform) => transform.apply(message.record),
            None => message.record,
        };
        buffer.append(record);

        self.stats.records += 1;
        observability::metrics::record_buffered(&message.stream);
        Ok(())
    }

    async fn flush_active(&mut self) -> Result<(), TargetError> {
        let Some(buffer) = self.active.as_mut() else {
            return Ok(());
        };

        let batch = FlushBatch {
            stream: buffer.stream().to_string(),
            rows: buffer.drain(),
            layout: buffer.layout().clone(),
            path: self.layout.path_for(buffer.stream()),
            compression: self.layout.compression(),
        };
        let rows = batch.rows.len();

        debug!(
            stream = %batch.stream,
            rows,
            path = %batch.path.display(),
            sink = self.sink.name(),
            "Flushing stream"
        );
        observability::metrics::record_flush(&batch.stream);

        let written = self.sink.write(batch).await?;
        self.stats.record_flush(rows, written);
        Ok(())
    }
}
