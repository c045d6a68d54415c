//! Output file management.
//!
//! Owns the active file handle and optional compressor. Opens in append
//! mode so an interrupted run never truncates earlier data; writes the
//! header exactly once per fresh file, immediately on open, so the file is
//! inspectable before the first flush.

use crate::config::CompressionMode;
use crate::error::{PipelineError, PipelineResult};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Active output stream, optionally layered through a streaming compressor.
enum CsvStream {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl CsvStream {
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.write_all(bytes),
            Self::Gzip(w) => w.write_all(bytes),
        }
    }

    /// Flush through to the OS so the file is readable while running.
    /// For gzip this emits a sync point at some cost in ratio.
    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }

    /// Release in dependency order: compressor trailer before the raw
    /// stream flush.
    fn close(self) -> std::io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(w) => w.finish()?.flush(),
        }
    }
}

/// One physical output destination.
pub struct CsvSink {
    path: PathBuf,
    compression: CompressionMode,
    header: &'static str,
    header_written: bool,
    stream: Option<CsvStream>,
}

impl CsvSink {
    /// Open a sink at `path`.
    ///
    /// Parent directories are created as needed; failure to create them is
    /// logged and the open still attempted. If the file already exists its
    /// header is treated as already written (best-effort, the content is
    /// not verified). A sink whose open failed carries no stream and every
    /// later write fails per chunk.
    pub fn open(path: PathBuf, compression: CompressionMode, header: &'static str) -> Self {
        let mut sink = Self {
            path,
            compression,
            header,
            header_written: false,
            stream: None,
        };
        sink.open_stream();
        sink
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn open_stream(&mut self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(?e, dir = %parent.display(), "Failed to create output directory");
            }
        }

        let existed = self.path.exists();

        let file = match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!(?e, path = %self.path.display(), "Failed to open output file");
                return;
            }
        };

        let writer = BufWriter::new(file);
        let mut stream = match self.compression {
            CompressionMode::None => CsvStream::Plain(writer),
            CompressionMode::Gzip => CsvStream::Gzip(GzEncoder::new(writer, Compression::fast())),
        };

        self.header_written = existed;
        if !self.header_written {
            let header_line = format!("{}{}", self.header, crate::format::CRLF);
            match stream
                .write_all(header_line.as_bytes())
                .and_then(|()| stream.flush())
            {
                Ok(()) => self.header_written = true,
                Err(e) => {
                    warn!(?e, path = %self.path.display(), "Failed to write header");
                }
            }
        } else {
            debug!(path = %self.path.display(), "Reopened existing file, header kept");
        }

        info!(
            path = %self.path.display(),
            compression = ?self.compression,
            append = existed,
            "Opened output file"
        );
        self.stream = Some(stream);
    }

    /// Append one chunk and flush the stream.
    pub fn write_chunk(&mut self, chunk: &str) -> PipelineResult<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| PipelineError::NoStream(self.path.display().to_string()))?;
        stream.write_all(chunk.as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    /// Flush and release compressor and file handles.
    pub fn close(&mut self) -> PipelineResult<()> {
        if let Some(stream) = self.stream.take() {
            stream.close()?;
            info!(path = %self.path.display(), "Closed output file");
        }
        Ok(())
    }

    /// Close the active file and open a new one at `new_path`.
    pub fn rotate(&mut self, new_path: PathBuf) {
        if let Err(e) = self.close() {
            warn!(?e, path = %self.path.display(), "Failed to close file on rotation");
        }
        self.path = new_path;
        self.open_stream();
    }
}
