//! Flush policy.
//!
//! Evaluated after every append and on every host timer tick. A flush
//! fires when any of the following holds:
//! - flush-every-record is enabled,
//! - the buffered byte count reached the size threshold,
//! - time-based flushing is enabled and the interval elapsed since the
//!   previous flush while the buffer is non-empty.

use crate::config::PipelineConfig;
use std::time::{Duration, Instant};

/// Decides when the rolling buffer is handed off for writing.
#[derive(Debug)]
pub struct FlushPolicy {
    every_record: bool,
    size_threshold: usize,
    /// `None` when time-based flushing is disabled (interval 0).
    interval: Option<Duration>,
    last_flush: Instant,
}

impl FlushPolicy {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        let interval = match config.flush_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            every_record: config.flush_every_record,
            size_threshold: config.flush_buffer_size,
            interval,
            last_flush: Instant::now(),
        }
    }

    /// Whether a buffer of `buffered_bytes` must be flushed now.
    #[must_use]
    pub fn should_flush(&self, buffered_bytes: usize) -> bool {
        self.should_flush_at(buffered_bytes, Instant::now())
    }

    /// Evaluation against an explicit clock, for tests.
    #[must_use]
    pub fn should_flush_at(&self, buffered_bytes: usize, now: Instant) -> bool {
        if self.every_record && buffered_bytes > 0 {
            return true;
        }
        if buffered_bytes >= self.size_threshold {
            return true;
        }
        match self.interval {
            Some(interval) => {
                buffered_bytes > 0 && now.duration_since(self.last_flush) >= interval
            }
            None => false,
        }
    }

    /// Record that a flush happened now.
    pub fn mark_flushed(&mut self) {
        self.mark_flushed_at(Instant::now());
    }

    pub fn mark_flushed_at(&mut self, now: Instant) {
        self.last_flush = now;
    }
}
