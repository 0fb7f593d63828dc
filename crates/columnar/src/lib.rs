//! # Columnar
//!
//! Turns buffered records into typed tabular batches.
//!
//! Responsibilities:
//! - Map a declared stream schema to a concrete `ColumnLayout`
//! - Coerce heterogeneous records into an Arrow `RecordBatch`
//! - Optional record flattening before buffering

mod coerce;
mod flatten;
mod type_map;

pub use coerce::build_batch;
pub use flatten::{flatten, Flatten};
pub use type_map::map_schema;
