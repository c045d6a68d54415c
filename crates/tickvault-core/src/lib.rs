//! Core domain types for tickvault market data capture.
//!
//! This crate provides the fundamental types used throughout the capture
//! pipeline:
//! - `Price`: precision-safe decimal price type
//! - `Instrument`: symbol plus display precision and pip size
//! - `Granularity`, `StreamKind`: bar aggregation period / stream classification
//! - `TickRecord`, `BarRecord`: immutable market events

pub mod error;
pub mod granularity;
pub mod instrument;
pub mod price;
pub mod record;

pub use error::{CoreError, CoreResult};
pub use granularity::{Granularity, StreamKind};
pub use instrument::Instrument;
pub use price::Price;
pub use record::{feed_to_utc, BarRecord, TickRecord};
