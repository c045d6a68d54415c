//! Record formatting.
//!
//! Turns one market record into a canonical CRLF-terminated CSV line.
//! Pure: no state beyond the instrument metadata and the configured feed
//! clock offset.

use chrono::{DateTime, Utc};
use tickvault_core::{feed_to_utc, BarRecord, Granularity, Instrument, StreamKind, TickRecord};

/// Header for tick output files.
pub const TICK_HEADER: &str = "DateTime(UTC),Instrument,Granularity,Bid,Ask,Spread(pips),Volume";

/// Header for bar output files.
pub const BAR_HEADER: &str =
    "DateTimeUTC,Instrument,Granularity,Open,High,Low,Close,Spread(pips),Volume";

/// Line terminator for all output.
pub const CRLF: &str = "\r\n";

/// Formats records for one instrument/granularity stream.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    instrument: Instrument,
    granularity: Granularity,
    utc_offset_hours: i64,
}

impl LineFormatter {
    pub fn new(instrument: Instrument, granularity: Granularity, utc_offset_hours: i64) -> Self {
        Self {
            instrument,
            granularity,
            utc_offset_hours,
        }
    }

    /// Header line (without terminator) for a stream kind.
    #[must_use]
    pub fn header(kind: StreamKind) -> &'static str {
        match kind {
            StreamKind::Ticks => TICK_HEADER,
            StreamKind::Bars => BAR_HEADER,
        }
    }

    #[inline]
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Feed-clock timestamp converted to UTC.
    #[inline]
    pub fn to_utc(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        feed_to_utc(timestamp, self.utc_offset_hours)
    }

    /// One tick as a CRLF-terminated CSV line, millisecond timestamps.
    #[must_use]
    pub fn tick_line(&self, tick: &TickRecord) -> String {
        let utc = self.to_utc(tick.timestamp);
        format!(
            "{},{},{},{},{},{:.2},{}{}",
            utc.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.instrument.symbol(),
            self.granularity.label(),
            self.instrument.format_price(tick.bid),
            self.instrument.format_price(tick.ask),
            self.instrument.spread_pips(tick.bid, tick.ask),
            tick.volume,
            CRLF,
        )
    }

    /// One bar as a CRLF-terminated CSV line, second timestamps.
    #[must_use]
    pub fn bar_line(&self, bar: &BarRecord) -> String {
        let utc = self.to_utc(bar.timestamp);
        format!(
            "{},{},{},{},{},{},{},{:.2},{}{}",
            utc.format("%Y-%m-%d %H:%M:%S"),
            self.instrument.symbol(),
            self.granularity.label(),
            self.instrument.format_price(bar.open),
            self.instrument.format_price(bar.high),
            self.instrument.format_price(bar.low),
            self.instrument.format_price(bar.close),
            bar.spread_pips,
            bar.volume,
            CRLF,
        )
    }
}
