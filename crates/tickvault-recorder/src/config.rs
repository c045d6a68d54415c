//! Recorder configuration.

use crate::error::{RecorderError, RecorderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tickvault_pipeline::PipelineConfig;

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Persistence pipeline options.
    #[serde(default)]
    pub output: PipelineConfig,
}

impl RecorderConfig {
    /// Load configuration from file.
    ///
    /// The path comes from `TICKVAULT_CONFIG`, falling back to
    /// `config/default.toml`. A missing file is not an error: defaults are
    /// used and a warning logged.
    pub fn load() -> RecorderResult<Self> {
        let config_path = std::env::var("TICKVAULT_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> RecorderResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecorderError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| RecorderError::Config(format!("Failed to parse config: {e}")))
    }
}
