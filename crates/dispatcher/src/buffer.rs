//! StreamBuffer - pending records of the active stream

use contracts::{ColumnLayout, Record, StreamSchema};

/// Records buffered for one stream, plus its current schema
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    stream: String,
    schema: StreamSchema,
    layout: ColumnLayout,
    records: Vec<Record>,
}

impl StreamBuffer {
    pub fn new(stream: impl Into<String>, schema: StreamSchema, layout: ColumnLayout) -> Self {
        Self {
            stream: stream.into(),
            schema,
            layout,
            records: Vec::new(),
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn schema(&self) -> &StreamSchema {
        &self.schema
    }

    /// Column layout mapped from the current schema
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Replace the schema (re-announcement of the same stream)
    pub fn set_schema(&mut self, schema: StreamSchema, layout: ColumnLayout) {
        self.schema = schema;
        self.layout = layout;
    }

    /// Records are kept verbatim; coercion happens at flush time
    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Take every buffered record in arrival order, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
