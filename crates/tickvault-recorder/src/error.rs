//! Recorder error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging init error: {0}")]
    Logging(String),
}

pub type RecorderResult<T> = Result<T, RecorderError>;
