//! Pipeline configuration.
//!
//! All options default to sensible values so a pipeline can run from an
//! empty TOML table. Mode enums are dispatched once at startup; nothing
//! re-branches per record.

use serde::{Deserialize, Serialize};

/// Output compression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Plain CSV.
    #[default]
    None,
    /// Streaming gzip, flushed per chunk so the file stays readable while
    /// the pipeline runs.
    Gzip,
}

impl CompressionMode {
    /// File extension for this mode.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::None => ".csv",
            Self::Gzip => ".csv.gz",
        }
    }
}

/// File rotation mode, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// One continuous file for the pipeline's lifetime, named provisionally
    /// until finalize renames it to the observed time range.
    #[default]
    None,
    /// A new file whenever the UTC date of an incoming record differs from
    /// the open file's date.
    Daily,
    /// One file per pipeline run, stamped with the session start time.
    Session,
}

/// Which tick changes are worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickFilterMode {
    /// Record every tick.
    #[default]
    All,
    /// Record when either side moved.
    #[serde(rename = "any_change")]
    AnyChange,
    /// Record only when the bid moved.
    #[serde(rename = "bid_only")]
    BidOnly,
    /// Record only when the ask moved.
    #[serde(rename = "ask_only")]
    AskOnly,
    /// Record only when the spread changed.
    #[serde(rename = "spread_change")]
    SpreadChange,
}

/// Persistence pipeline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Subfolder under the host-provided data root.
    #[serde(default = "default_subfolder")]
    pub subfolder: String,
    /// Output compression.
    #[serde(default)]
    pub compression: CompressionMode,
    /// File rotation.
    #[serde(default)]
    pub rotation: RotationMode,
    /// Hand chunks to a background writer (true) or write on the producer
    /// path (false, lower latency but the producer blocks on I/O).
    #[serde(default = "default_async_writes")]
    pub async_writes: bool,
    /// Flush after every record, regardless of buffer size.
    #[serde(default)]
    pub flush_every_record: bool,
    /// Soft buffer threshold in bytes. Tens of KB suits tick streams;
    /// on the order of 1 MB suits bar streams.
    #[serde(default = "default_flush_buffer_size")]
    pub flush_buffer_size: usize,
    /// Time-based flush interval in seconds. 0 disables time-based flushing.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// Hours the feed clock runs ahead of UTC. Subtracted on formatting.
    #[serde(default)]
    pub utc_offset_hours: i64,
    /// Tick record filter. Ignored for bar streams.
    #[serde(default)]
    pub tick_filter: TickFilterMode,
}

fn default_subfolder() -> String {
    "market_data".to_string()
}

fn default_async_writes() -> bool {
    true
}

fn default_flush_buffer_size() -> usize {
    64 * 1024
}

fn default_flush_interval_secs() -> u64 {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            subfolder: default_subfolder(),
            compression: CompressionMode::default(),
            rotation: RotationMode::default(),
            async_writes: default_async_writes(),
            flush_every_record: false,
            flush_buffer_size: default_flush_buffer_size(),
            flush_interval_secs: default_flush_interval_secs(),
            utc_offset_hours: 0,
            tick_filter: TickFilterMode::default(),
        }
    }
}
