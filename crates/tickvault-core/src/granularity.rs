//! Bar aggregation periods and stream classification.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation period of the captured stream.
///
/// `Tick` means unaggregated bid/ask updates; everything else is an OHLC
/// bar period. The label doubles as the granularity column value and the
/// filename component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Tick,
    S10,
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
}

impl Granularity {
    /// Label used in CSV lines and output filenames.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tick => "TICK",
            Self::S10 => "S10",
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
            Self::W1 => "W1",
        }
    }

    #[must_use]
    pub fn is_tick(&self) -> bool {
        matches!(self, Self::Tick)
    }

    /// The kind of stream this granularity produces.
    #[must_use]
    pub fn stream_kind(&self) -> StreamKind {
        if self.is_tick() {
            StreamKind::Ticks
        } else {
            StreamKind::Bars
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TICK" => Ok(Self::Tick),
            "S10" => Ok(Self::S10),
            "M1" => Ok(Self::M1),
            "M5" => Ok(Self::M5),
            "M15" => Ok(Self::M15),
            "M30" => Ok(Self::M30),
            "H1" => Ok(Self::H1),
            "H4" => Ok(Self::H4),
            "D1" => Ok(Self::D1),
            "W1" => Ok(Self::W1),
            other => Err(CoreError::InvalidGranularity(other.to_string())),
        }
    }
}

/// Whether a pipeline instance records ticks or bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Ticks,
    Bars,
}

impl StreamKind {
    /// Filename component ("ticks" / "bars").
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ticks => "ticks",
            Self::Bars => "bars",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
