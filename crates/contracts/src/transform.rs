//! RecordTransform trait - optional pre-processing applied before buffering

use crate::Record;

/// Pure record-to-record transform
pub trait RecordTransform: Send + Sync {
    /// Transform name (used for logging)
    fn name(&self) -> &str;

    fn apply(&self, record: Record) -> Record;
}
