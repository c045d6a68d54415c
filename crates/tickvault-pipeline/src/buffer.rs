//! Rolling line buffer.
//!
//! A single owned text accumulator per pipeline instance. The producer
//! appends formatted lines; at flush time the accumulated text is taken as
//! an immutable chunk and the buffer is immediately empty again, so record
//! ingestion never waits on I/O.

/// Append-only text accumulator with a soft capacity.
#[derive(Debug)]
pub struct LineBuffer {
    buf: String,
    capacity_hint: usize,
}

impl LineBuffer {
    /// Create a buffer pre-sized to the flush threshold.
    #[must_use]
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity_hint),
            capacity_hint,
        }
    }

    /// Append one fully formed line (terminator included).
    pub fn append(&mut self, line: &str) {
        self.buf.push_str(line);
    }

    /// Accumulated length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the accumulated text as an immutable chunk, leaving the buffer
    /// empty and ready for new appends.
    #[must_use]
    pub fn snapshot_and_reset(&mut self) -> String {
        std::mem::replace(&mut self.buf, String::with_capacity(self.capacity_hint))
    }
}
