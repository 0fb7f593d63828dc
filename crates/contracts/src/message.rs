//! Protocol messages
//!
//! One message per input line. Only the three kinds below exist; anything else
//! is rejected by the parser.

use serde::{Deserialize, Serialize};

use crate::{Record, StreamSchema};

/// A parsed protocol message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Schema(SchemaMessage),
    Record(RecordMessage),
    State(StateMessage),
}

impl Message {
    /// Wire name of the message kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "SCHEMA",
            Self::Record(_) => "RECORD",
            Self::State(_) => "STATE",
        }
    }

    /// Stream the message refers to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema(m) => Some(&m.stream),
            Self::Record(m) => Some(&m.stream),
            Self::State(_) => None,
        }
    }
}

/// `SCHEMA`: announces (or re-announces) the field types of a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMessage {
    pub stream: String,
    pub schema: StreamSchema,
    /// Ignored by the target
    #[serde(default)]
    pub key_properties: Vec<String>,
}

/// `RECORD`: one row for a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub stream: String,
    pub record: Record,
}

/// `STATE`: opaque checkpoint value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    pub value: serde_json::Value,
}

/// Last checkpoint value, forwarded verbatim to the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(pub serde_json::Value);

impl Checkpoint {
    /// Single-line JSON encoding written to the checkpoint channel
    pub fn to_line(&self) -> String {
        self.0.to_string()
    }
}
