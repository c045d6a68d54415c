//! Background chunk writer.
//!
//! A single spawned task owns the sink and drains the handoff queue in
//! FIFO order, blocking on the channel between chunks (wake-on-enqueue,
//! no polling). Cancellation is cooperative: the producer drops its queue
//! handle, the channel reports every command enqueued up to that point and
//! only then ends, so nothing handed off before shutdown is silently
//! dropped. A failed chunk write is logged and the chunk lost; it is never
//! requeued.

use crate::queue::{command_channel, HandoffQueue, WriterCommand};
use crate::sink::CsvSink;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long the owning pipeline waits for the writer to drain on shutdown
/// before proceeding to tear down regardless.
pub const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the background writer task.
pub struct WriterHandle {
    queue: HandoffQueue,
    handle: JoinHandle<()>,
}

impl WriterHandle {
    /// Spawn the writer task taking ownership of `sink`.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn spawn(sink: CsvSink) -> Self {
        let (queue, rx) = command_channel();
        let handle = tokio::spawn(run(sink, rx));
        Self { queue, handle }
    }

    /// Hand a command to the writer without blocking.
    pub fn enqueue(&self, command: WriterCommand) {
        self.queue.enqueue(command);
    }

    /// Signal shutdown and wait for the writer to drain and close, up to
    /// `timeout`. Returns false if the wait timed out, in which case
    /// still-queued chunks may never reach disk (logged, accepted risk).
    pub async fn shutdown(self, timeout: Duration) -> bool {
        let Self { queue, handle } = self;
        // Dropping the last queue handle ends the channel; the writer sees
        // every command already enqueued, then exits.
        drop(queue);

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(?e, "Writer task failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?timeout, "Writer drain timed out, abandoning queued chunks");
                false
            }
        }
    }
}

async fn run(mut sink: CsvSink, mut rx: UnboundedReceiver<WriterCommand>) {
    while let Some(command) = rx.recv().await {
        apply(&mut sink, command);
    }
    if let Err(e) = sink.close() {
        warn!(?e, "Failed to close sink on writer exit");
    }
    debug!("Writer drained and exited");
}

fn apply(sink: &mut CsvSink, command: WriterCommand) {
    match command {
        WriterCommand::Write(chunk) => {
            if let Err(e) = sink.write_chunk(&chunk) {
                warn!(?e, bytes = chunk.len(), "Chunk write failed, dropping chunk");
            }
        }
        WriterCommand::Rotate(path) => {
            debug!(path = %path.display(), "Rotating output file");
            sink.rotate(path);
        }
    }
}
