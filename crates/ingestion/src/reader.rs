//! Line-oriented message reader

use contracts::{Message, TargetError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::trace;

use crate::parse::parse_message;

/// Reads one message per line from an async source
///
/// Blank lines are skipped. Every error carries the 1-based line number.
pub struct MessageReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin> MessageReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next message, or `None` at end of input
    ///
    /// # Errors
    /// - `Protocol` for malformed lines or non-UTF-8 input
    /// - `Io` when the source fails
    pub async fn next_message(&mut self) -> Result<Option<Message>, TargetError> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    return Err(TargetError::protocol(format!(
                        "line {}: input is not valid UTF-8",
                        self.line_number + 1
                    )));
                }
                Err(e) => return Err(TargetError::io("<input>", e)),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                trace!(line = self.line_number, "skipping blank line");
                continue;
            }

            return match parse_message(&line) {
                Ok(message) => Ok(Some(message)),
                Err(TargetError::Protocol { message }) => Err(TargetError::protocol(format!(
                    "line {}: {message}",
                    self.line_number
                ))),
                Err(other) => Err(other),
            };
        }
    }
}
