//! Instrument metadata.
//!
//! An instrument carries the display precision used when formatting its
//! prices and the pip size used when expressing spreads. Both come from the
//! host platform at session start; nothing here is discovered at runtime.

use crate::error::{CoreError, CoreResult};
use crate::price::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument identity plus numeric precision metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Symbol, e.g. "EURUSD".
    symbol: String,
    /// Number of decimal digits when displaying prices.
    digits: u32,
    /// Smallest conventional price increment, e.g. 0.0001 for EURUSD.
    pip: Decimal,
}

impl Instrument {
    /// Create an instrument with the conventional pip size for its digit
    /// count: `10^-(digits - 1)` (0.0001 for 5-digit pairs, 0.01 for
    /// 3-digit JPY pairs).
    pub fn new(symbol: impl Into<String>, digits: u32) -> CoreResult<Self> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(CoreError::InvalidInstrument("empty symbol".to_string()));
        }
        if digits == 0 || digits > 12 {
            return Err(CoreError::InvalidInstrument(format!(
                "unsupported digit count {digits} for {symbol}"
            )));
        }
        let pip = Decimal::new(1, digits - 1);
        Ok(Self {
            symbol,
            digits,
            pip,
        })
    }

    /// Override the derived pip size (metals and indices deviate from the
    /// FX convention).
    #[must_use]
    pub fn with_pip(mut self, pip: Decimal) -> Self {
        self.pip = pip;
        self
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    #[inline]
    pub fn pip(&self) -> Decimal {
        self.pip
    }

    /// Format a price with this instrument's digit count.
    pub fn format_price(&self, price: Price) -> String {
        format!("{:.*}", self.digits as usize, price.inner())
    }

    /// Spread between bid and ask expressed in pips.
    pub fn spread_pips(&self, bid: Price, ask: Price) -> Decimal {
        ((ask - bid).inner() / self.pip).round_dp(2)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
