//! Host-facing event adapter.
//!
//! The hosting platform drives the pipeline through four notifications:
//! session start (instrument, granularity, time context), per-record
//! delivery, a periodic timer, and session stop. Notifications arriving
//! outside the started window are logged and dropped; the host is never
//! interrupted by a pipeline fault.

use crate::config::RecorderConfig;
use chrono::{DateTime, Utc};
use std::path::Path;
use tickvault_core::{BarRecord, Granularity, Instrument, TickRecord};
use tickvault_pipeline::Pipeline;
use tracing::{debug, info, warn};

/// Adapts host callbacks onto one capture pipeline.
pub struct Recorder {
    config: RecorderConfig,
    pipeline: Option<Pipeline>,
}

impl Recorder {
    #[must_use]
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            pipeline: None,
        }
    }

    /// Whether a session is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Session start: build the pipeline. The stream kind follows the
    /// granularity (tick granularity records ticks, bar granularities
    /// record bars). A second start while running is ignored.
    pub fn on_start(
        &mut self,
        instrument: Instrument,
        granularity: Granularity,
        data_root: &Path,
        started_at: DateTime<Utc>,
    ) {
        if self.pipeline.is_some() {
            warn!("Start received while already running, ignoring");
            return;
        }
        info!(
            instrument = %instrument,
            granularity = %granularity,
            data_root = %data_root.display(),
            "Recorder starting"
        );
        self.pipeline = Some(Pipeline::start(
            instrument,
            granularity,
            granularity.stream_kind(),
            data_root,
            &self.config.output,
            started_at,
        ));
    }

    /// One tick from the feed.
    pub fn on_tick(&mut self, tick: &TickRecord) {
        match &mut self.pipeline {
            Some(pipeline) => pipeline.log_tick(tick),
            None => debug!("Tick before start, ignored"),
        }
    }

    /// One bar from the feed.
    pub fn on_bar(&mut self, bar: &BarRecord) {
        match &mut self.pipeline {
            Some(pipeline) => pipeline.log_bar(bar),
            None => debug!("Bar before start, ignored"),
        }
    }

    /// Periodic timer from the host.
    pub fn on_timer(&mut self) {
        if let Some(pipeline) = &mut self.pipeline {
            pipeline.on_timer();
        }
    }

    /// Session stop: final flush, drain, close, finalize.
    pub async fn on_stop(&mut self) {
        match self.pipeline.take() {
            Some(pipeline) => {
                let path = pipeline.stop().await;
                info!(path = %path.display(), "Recorder stopped");
            }
            None => warn!("Stop received while not running, ignoring"),
        }
    }
}
