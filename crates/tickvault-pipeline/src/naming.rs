//! Output file naming and end-of-run finalization.
//!
//! Filenames are built from instrument, granularity, and a time component
//! that depends on the rotation mode. A continuous (non-rotating) run
//! carries a provisional `_to_RUNNING_` name until shutdown, when it is
//! renamed to the observed first/last record timestamps.

use crate::config::CompressionMode;
use crate::error::{PipelineError, PipelineResult};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on `_1`, `_2`, … collision probes during finalize.
const MAX_RENAME_ATTEMPTS: u32 = 100;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Computes provisional and final file names for one stream.
#[derive(Debug, Clone)]
pub struct FileNamer {
    symbol: String,
    granularity: String,
    kind_tag: &'static str,
    extension: &'static str,
}

impl FileNamer {
    pub fn new(
        symbol: impl Into<String>,
        granularity: impl Into<String>,
        kind_tag: &'static str,
        compression: CompressionMode,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            granularity: granularity.into(),
            kind_tag,
            extension: compression.extension(),
        }
    }

    /// Provisional name for a continuous run, before the time range is known.
    #[must_use]
    pub fn provisional(&self, opened_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}_to_RUNNING_{}{}",
            self.symbol,
            self.granularity,
            opened_at.format(STAMP_FORMAT),
            self.kind_tag,
            self.extension,
        )
    }

    /// Name for one UTC calendar day of data.
    #[must_use]
    pub fn daily(&self, date: NaiveDate) -> String {
        format!(
            "{}_{}_{}_{}{}",
            self.symbol,
            self.granularity,
            date.format("%Y%m%d"),
            self.kind_tag,
            self.extension,
        )
    }

    /// Name for one pipeline run, stamped with its start time.
    #[must_use]
    pub fn session(&self, started_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}_{}{}",
            self.symbol,
            self.granularity,
            started_at.format(STAMP_FORMAT),
            self.kind_tag,
            self.extension,
        )
    }

    /// Final name carrying the observed first/last record timestamps.
    #[must_use]
    pub fn finalized(&self, first: DateTime<Utc>, last: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}_to_{}_{}{}",
            self.symbol,
            self.granularity,
            first.format(STAMP_FORMAT),
            last.format(STAMP_FORMAT),
            self.kind_tag,
            self.extension,
        )
    }

    /// Rename the provisional file to its finalized name.
    ///
    /// On collision, `_1`, `_2`, … are inserted before the extension until a
    /// free name is found, up to a bounded number of attempts. When the cap
    /// is exhausted the finalize fails and the provisional name is kept; the
    /// file is never moved onto an occupied name.
    pub fn finalize(
        &self,
        provisional_path: &Path,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    ) -> PipelineResult<PathBuf> {
        let dir = provisional_path.parent().unwrap_or_else(|| Path::new("."));
        let base = self.finalized(first, last);

        for attempt in 0..=MAX_RENAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                dir.join(&base)
            } else {
                dir.join(with_suffix(&base, self.extension, attempt))
            };

            if candidate.exists() {
                debug!(candidate = %candidate.display(), "Final name taken, probing next");
                continue;
            }

            std::fs::rename(provisional_path, &candidate)?;
            info!(
                from = %provisional_path.display(),
                to = %candidate.display(),
                "Finalized output file"
            );
            return Ok(candidate);
        }

        Err(PipelineError::Finalize(format!(
            "no free name for {base} after {MAX_RENAME_ATTEMPTS} attempts"
        )))
    }
}

/// Insert `_n` between the file stem and its (possibly double) extension.
fn with_suffix(name: &str, extension: &str, n: u32) -> String {
    match name.strip_suffix(extension) {
        Some(stem) => format!("{stem}_{n}{extension}"),
        None => format!("{name}_{n}"),
    }
}
