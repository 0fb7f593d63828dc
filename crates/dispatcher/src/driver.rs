//! Driver - feeds the input to the dispatcher and emits the checkpoint

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

use contracts::{BatchSink, Checkpoint, TargetError};
use ingestion::MessageReader;

use crate::dispatcher::{Dispatcher, RunSummary};

/// Runs one dispatcher over a whole input
pub struct Driver<S> {
    dispatcher: Dispatcher<S>,
}

impl<S: BatchSink> Driver<S> {
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self { dispatcher }
    }

    /// Consume `input` to the end, flush, then write the checkpoint to `output`
    ///
    /// The checkpoint line is written once, and only if the run succeeded and a
    /// non-null `STATE` was seen.
    #[instrument(name = "driver_run", skip_all)]
    pub async fn run<R, W>(self, input: R, output: &mut W) -> Result<RunSummary, TargetError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = MessageReader::new(input);
        let mut dispatcher = self.dispatcher;

        while let Some(message) = reader.next_message().await? {
            dispatcher.handle(message).await?;
        }
        debug!(lines = reader.line_number(), "Input exhausted");

        let summary = dispatcher.finish().await?;
        match &summary.checkpoint {
            Some(checkpoint) => emit_checkpoint(output, checkpoint).await?,
            None => info!("No checkpoint to emit"),
        }

        Ok(summary)
    }
}

async fn emit_checkpoint<W>(output: &mut W, checkpoint: &Checkpoint) -> Result<(), TargetError>
where
    W: AsyncWrite + Unpin,
{
    let line = checkpoint.to_line();
    debug!(checkpoint = %line, "Emitting checkpoint");

    output
        .write_all(line.as_bytes())
        .await
        .map_err(TargetError::Output)?;
    output.write_all(b"\n").await.map_err(TargetError::Output)?;
    output.flush().await.map_err(TargetError::Output)
}
