//! Tick record filtering.
//!
//! A configurable predicate that suppresses ticks which did not change the
//! tracked side(s). The first tick of a session is always accepted to
//! establish a baseline. Suppressed ticks still update the comparison state:
//! changes are judged against the last observed tick, not the last recorded
//! one. Filtering decides what is appended, never when flushes happen.

use crate::config::TickFilterMode;
use tickvault_core::{Price, TickRecord};

/// Stateful tick filter for one pipeline instance.
#[derive(Debug)]
pub struct TickFilter {
    mode: TickFilterMode,
    last: Option<(Price, Price)>,
}

impl TickFilter {
    #[must_use]
    pub fn new(mode: TickFilterMode) -> Self {
        Self { mode, last: None }
    }

    /// Whether this tick should be recorded.
    pub fn accept(&mut self, tick: &TickRecord) -> bool {
        let current = (tick.bid, tick.ask);
        let accepted = match self.last {
            None => true,
            Some((last_bid, last_ask)) => match self.mode {
                TickFilterMode::All => true,
                TickFilterMode::AnyChange => tick.bid != last_bid || tick.ask != last_ask,
                TickFilterMode::BidOnly => tick.bid != last_bid,
                TickFilterMode::AskOnly => tick.ask != last_ask,
                TickFilterMode::SpreadChange => tick.ask - tick.bid != last_ask - last_bid,
            },
        };
        self.last = Some(current);
        accepted
    }
}
