//! Pipeline error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No open output stream for {0}")]
    NoStream(String),

    #[error("Finalize failed: {0}")]
    Finalize(String),

    #[error("Writer unavailable: {0}")]
    WriterUnavailable(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
