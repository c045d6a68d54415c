//! Market data records.
//!
//! A record is one observed market event, immutable once constructed.
//! Timestamps carry the feed's clock; conversion to UTC happens at
//! formatting time by subtracting the configured fixed offset (no DST
//! handling).

use crate::price::Price;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Convert a feed-clock timestamp to UTC by subtracting a fixed hour offset.
///
/// An offset of +3 means the feed clock runs three hours ahead of UTC.
#[must_use]
pub fn feed_to_utc(timestamp: DateTime<Utc>, offset_hours: i64) -> DateTime<Utc> {
    timestamp - Duration::hours(offset_hours)
}

/// One bid/ask price update from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Feed-clock timestamp of the update.
    pub timestamp: DateTime<Utc>,
    /// Best bid price.
    pub bid: Price,
    /// Best ask price.
    pub ask: Price,
    /// Tick volume.
    pub volume: u64,
}

impl TickRecord {
    pub fn new(timestamp: DateTime<Utc>, bid: Price, ask: Price, volume: u64) -> Self {
        Self {
            timestamp,
            bid,
            ask,
            volume,
        }
    }

    /// Spread as a raw price difference (ask - bid).
    #[must_use]
    pub fn spread(&self) -> Price {
        self.ask - self.bid
    }
}

/// One aggregated OHLC candle from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarRecord {
    /// Feed-clock timestamp of the bar open.
    pub timestamp: DateTime<Utc>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    /// Average spread over the bar, already expressed in pips.
    pub spread_pips: rust_decimal::Decimal,
    /// Aggregated volume.
    pub volume: u64,
}

impl BarRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        spread_pips: rust_decimal::Decimal,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            spread_pips,
            volume,
        }
    }
}
