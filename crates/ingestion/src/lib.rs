//! # Ingestion
//!
//! Input transport for the target.
//!
//! Responsibilities:
//! - Read newline-delimited protocol messages from an async byte source
//! - Parse each line into a `Message`, rejecting malformed lines and unknown kinds
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::MessageReader;
//!
//! let mut reader = MessageReader::new(tokio::io::BufReader::new(tokio::io::stdin()));
//! while let Some(message) = reader.next_message().await? {
//!     // Process message
//! }
//! ```

mod parse;
mod reader;

pub use contracts::Message;
pub use parse::parse_message;
pub use reader::MessageReader;
