//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the target.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Message`: one parsed protocol line (`SCHEMA` / `RECORD` / `STATE`)
//! - `Record` / `Value`: closed, ordered representation of a record payload
//! - `StreamSchema` -> `ColumnLayout`: declared field types and their concrete columns
//! - `BatchSink`: where a flushed stream buffer ends up

mod config;
mod error;
mod message;
mod schema;
mod sink;
mod transform;
mod value;

pub use config::*;
pub use error::*;
pub use message::*;
pub use schema::*;
pub use sink::*;
pub use transform::RecordTransform;
pub use value::{Record, Value};
