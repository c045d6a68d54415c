//! Buffered, asynchronously flushed CSV persistence for market data.
//!
//! The producer side formats records into a rolling buffer; a flush policy
//! (size, time, or every-record) hands immutable chunks to a background
//! writer over a FIFO channel; the writer streams them into a CSV file,
//! optionally through gzip, with rotation and end-of-run filename
//! finalization. The producer never blocks on disk I/O.

pub mod buffer;
pub mod config;
pub mod error;
pub mod filter;
pub mod flush;
pub mod format;
pub mod naming;
pub mod pipeline;
pub mod queue;
pub mod sink;
pub mod writer;

pub use config::{CompressionMode, PipelineConfig, RotationMode, TickFilterMode};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::Pipeline;
