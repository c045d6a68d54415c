//! Producer-to-writer handoff queue.
//!
//! An unbounded FIFO channel of writer commands. Enqueueing never blocks
//! the producer; on-disk record order depends on arrival order being
//! preserved exactly, which the single-reader channel guarantees.

use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::warn;

/// One unit of work for the background writer.
#[derive(Debug)]
pub enum WriterCommand {
    /// Append a chunk of fully formed lines to the active file.
    Write(String),
    /// Close the active file and open a new one at the given path.
    Rotate(PathBuf),
}

/// Create the handoff channel.
pub fn command_channel() -> (HandoffQueue, mpsc::UnboundedReceiver<WriterCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (HandoffQueue { tx }, rx)
}

/// Producer-side handle. Cheap to clone; dropping the last clone signals
/// the writer to drain and exit.
#[derive(Debug, Clone)]
pub struct HandoffQueue {
    tx: mpsc::UnboundedSender<WriterCommand>,
}

impl HandoffQueue {
    /// Enqueue a command without blocking. If the writer has already gone
    /// away the command is dropped and a warning logged; the producer is
    /// never failed for it.
    pub fn enqueue(&self, command: WriterCommand) {
        if self.tx.send(command).is_err() {
            warn!("Writer gone, dropping queued command");
        }
    }
}
