//! Core error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid instrument: {0}")]
    InvalidInstrument(String),

    #[error("Decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
