//! The per-run capture pipeline.
//!
//! One `Pipeline` instance owns everything a run needs: formatter, rolling
//! buffer, flush policy, tick filter, naming state, and the output backend
//! (a background writer task, or the sink directly in synchronous mode).
//! Constructed at session start, torn down at session stop; there is no
//! ambient state.
//!
//! The ingestion path (`log_tick`/`log_bar`/`on_timer`) takes `&mut self`:
//! the exclusive borrow makes the snapshot-and-handoff step a critical
//! section enforced at compile time, so size-based and timer-based triggers
//! can never interleave within it.

use crate::buffer::LineBuffer;
use crate::config::{PipelineConfig, RotationMode};
use crate::filter::TickFilter;
use crate::flush::FlushPolicy;
use crate::format::LineFormatter;
use crate::naming::FileNamer;
use crate::queue::WriterCommand;
use crate::sink::CsvSink;
use crate::writer::{WriterHandle, SHUTDOWN_DRAIN_TIMEOUT};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tickvault_core::{BarRecord, Granularity, Instrument, StreamKind, TickRecord};
use tracing::{debug, info, warn};

/// Where flushed chunks go, decided once at startup.
enum Backend {
    /// Producer-path writes: lowest latency, the producer blocks on I/O.
    Direct(CsvSink),
    /// Handoff to the background writer task.
    Queued(WriterHandle),
}

/// Market data capture pipeline for one instrument/granularity stream.
pub struct Pipeline {
    kind: StreamKind,
    rotation: RotationMode,
    formatter: LineFormatter,
    buffer: LineBuffer,
    policy: FlushPolicy,
    filter: TickFilter,
    namer: FileNamer,
    dir: PathBuf,
    backend: Backend,
    active_path: PathBuf,
    active_date: NaiveDate,
    /// First/last record timestamps written to the active file. Reset on
    /// rotation; consumed by finalize.
    first_ts: Option<DateTime<Utc>>,
    last_ts: Option<DateTime<Utc>>,
}

impl Pipeline {
    /// Open the output destination and start the pipeline.
    ///
    /// `kind` selects which stream this instance records; it is usually
    /// `granularity.stream_kind()` but may differ (e.g. capturing the raw
    /// tick stream of an instrument subscribed at a bar period).
    /// `started_at` is the feed-clock start time provided by the host.
    /// With `async_writes` enabled this must be called within a tokio
    /// runtime, since it spawns the writer task.
    #[must_use]
    pub fn start(
        instrument: Instrument,
        granularity: Granularity,
        kind: StreamKind,
        data_root: &Path,
        config: &PipelineConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        let formatter = LineFormatter::new(
            instrument.clone(),
            granularity,
            config.utc_offset_hours,
        );
        let start_utc = formatter.to_utc(started_at);

        let namer = FileNamer::new(
            instrument.symbol(),
            granularity.label(),
            kind.tag(),
            config.compression,
        );
        let dir = data_root.join(&config.subfolder);
        let file_name = match config.rotation {
            RotationMode::None => namer.provisional(start_utc),
            RotationMode::Daily => namer.daily(start_utc.date_naive()),
            RotationMode::Session => namer.session(start_utc),
        };
        let active_path = dir.join(file_name);

        let sink = CsvSink::open(
            active_path.clone(),
            config.compression,
            LineFormatter::header(kind),
        );
        let backend = if config.async_writes {
            Backend::Queued(WriterHandle::spawn(sink))
        } else {
            Backend::Direct(sink)
        };

        info!(
            instrument = %instrument,
            granularity = %granularity,
            path = %active_path.display(),
            rotation = ?config.rotation,
            async_writes = config.async_writes,
            "Pipeline started"
        );

        Self {
            kind,
            rotation: config.rotation,
            formatter,
            buffer: LineBuffer::with_capacity(config.flush_buffer_size),
            policy: FlushPolicy::new(config),
            filter: TickFilter::new(config.tick_filter),
            namer,
            dir,
            backend,
            active_path,
            active_date: start_utc.date_naive(),
            first_ts: None,
            last_ts: None,
        }
    }

    /// Path of the currently active output file.
    #[must_use]
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    /// Bytes currently buffered and not yet handed off.
    #[must_use]
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Ingest one tick.
    pub fn log_tick(&mut self, tick: &TickRecord) {
        if self.kind != StreamKind::Ticks {
            warn!("Tick received on a bar pipeline, ignoring");
            return;
        }
        let ts_utc = self.formatter.to_utc(tick.timestamp);
        self.maybe_rotate(ts_utc);
        if !self.filter.accept(tick) {
            return;
        }
        let line = self.formatter.tick_line(tick);
        self.append(&line, ts_utc);
    }

    /// Ingest one bar. Bars are never filtered.
    pub fn log_bar(&mut self, bar: &BarRecord) {
        if self.kind != StreamKind::Bars {
            warn!("Bar received on a tick pipeline, ignoring");
            return;
        }
        let ts_utc = self.formatter.to_utc(bar.timestamp);
        self.maybe_rotate(ts_utc);
        let line = self.formatter.bar_line(bar);
        self.append(&line, ts_utc);
    }

    /// Periodic tick from the host, driving time-based flushing.
    pub fn on_timer(&mut self) {
        if self.policy.should_flush(self.buffer.len()) {
            self.flush_now();
        }
    }

    /// Flush the remaining buffer, drain the writer, close the output and
    /// finalize the filename. Consumes the pipeline.
    ///
    /// Returns the path the data ended up at (finalized name when a
    /// continuous run was renamed, the active path otherwise).
    pub async fn stop(mut self) -> PathBuf {
        self.flush_now();

        match self.backend {
            Backend::Direct(mut sink) => {
                if let Err(e) = sink.close() {
                    warn!(?e, "Failed to close sink on stop");
                }
            }
            Backend::Queued(writer) => {
                writer.shutdown(SHUTDOWN_DRAIN_TIMEOUT).await;
            }
        }

        let final_path = match (self.rotation, self.first_ts, self.last_ts) {
            (RotationMode::None, Some(first), Some(last)) => {
                match self.namer.finalize(&self.active_path, first, last) {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(?e, path = %self.active_path.display(),
                            "Finalize failed, keeping provisional name");
                        self.active_path
                    }
                }
            }
            (RotationMode::None, _, _) => {
                debug!("No records observed, finalize skipped");
                self.active_path
            }
            _ => self.active_path,
        };

        info!(path = %final_path.display(), "Pipeline stopped");
        final_path
    }

    fn append(&mut self, line: &str, ts_utc: DateTime<Utc>) {
        if self.first_ts.is_none() {
            self.first_ts = Some(ts_utc);
        }
        self.last_ts = Some(ts_utc);

        self.buffer.append(line);
        if self.policy.should_flush(self.buffer.len()) {
            self.flush_now();
        }
    }

    /// Snapshot the buffer and hand the chunk off. No-op on an empty
    /// buffer.
    fn flush_now(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let chunk = self.buffer.snapshot_and_reset();
        self.policy.mark_flushed();

        match &mut self.backend {
            Backend::Direct(sink) => {
                if let Err(e) = sink.write_chunk(&chunk) {
                    warn!(?e, bytes = chunk.len(), "Chunk write failed, dropping chunk");
                }
            }
            Backend::Queued(writer) => {
                writer.enqueue(WriterCommand::Write(chunk));
            }
        }
    }

    /// Daily rotation: a record dated past the open file's UTC date flushes
    /// what belongs to the old file, then swaps in the new one. The rotate
    /// command rides the same FIFO queue as the chunks, so ordering across
    /// the boundary is preserved.
    fn maybe_rotate(&mut self, ts_utc: DateTime<Utc>) {
        if self.rotation != RotationMode::Daily {
            return;
        }
        let date = ts_utc.date_naive();
        if date == self.active_date {
            return;
        }

        self.flush_now();
        let new_path = self.dir.join(self.namer.daily(date));
        info!(
            from = %self.active_path.display(),
            to = %new_path.display(),
            "Daily rotation"
        );

        match &mut self.backend {
            Backend::Direct(sink) => sink.rotate(new_path.clone()),
            Backend::Queued(writer) => {
                writer.enqueue(WriterCommand::Rotate(new_path.clone()));
            }
        }

        self.active_path = new_path;
        self.active_date = date;
        self.first_ts = None;
        self.last_ts = None;
    }
}
