//! Incremental session: a growable buffer driven by the stateless scanner.
//!
//! ```text
//! Input chunks        Session                       Consumer
//!     │                  │                              │
//!     │──feed(chunk)────▶│                              │
//!     │                  │◀──advance()──────────────────│
//!     │                  │   scan from committed pos    │
//!     │                  │   complete?  commit, true ──▶│──take_event()
//!     │                  │   partial?   false ─────────▶│  (feed more, retry)
//!     │──close()────────▶│   partial units now resolve  │
//! ```
//!
//! A unit counts as partial when the scanner had to stop because the
//! buffered bytes ran out. Until the session is closed such a unit is not
//! committed; the next `advance` rescans it from the same starting point with
//! more bytes visible. This makes the event sequence independent of how the
//! input was split into chunks.

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::event::Event;
use crate::options::Options;
use crate::scanner;
use crate::span::Location;

#[derive(Debug, Clone, Default)]
pub struct Session {
    buffer: Vec<u8>,
    /// Absolute stream offset of `buffer[0]` (non-zero after compaction)
    base: usize,
    /// Position after the last committed unit
    committed: Location,
    closed: bool,
    event: Option<Event>,
    errors: Vec<ParseError>,
    options: Options,
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            buffer: Vec::with_capacity(options.get_initial_capacity()),
            options,
            ..Self::default()
        }
    }

    /// Append bytes. Always allowed, even after the input was exhausted.
    pub fn feed(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.closed {
            debug!(len = bytes.len(), "bytes fed after close, scanning as end of input");
        }
        self.buffer.extend_from_slice(bytes);
        trace!(len = bytes.len(), buffered = self.buffered(), "fed");
    }

    /// Mark end of input. Partial units left in the buffer are resolved on
    /// the following `advance` calls instead of waiting for more bytes.
    pub fn close(&mut self) {
        self.closed = true;
        trace!(buffered = self.buffered(), "closed");
    }

    /// Try to produce the next event.
    ///
    /// Returns `false` when the buffer is drained, or when it ends partway
    /// through a unit and the session is still open. In the second case feed
    /// more bytes (or close) and call again.
    pub fn advance(&mut self) -> bool {
        self.event = None;

        let mut cursor = Cursor::resume(&self.buffer, self.base, self.committed);
        let Some(scanned) = scanner::scan(&mut cursor) else {
            return false;
        };
        if cursor.touched_end() && !self.closed {
            trace!(offset = self.committed.offset, "partial unit, waiting for input");
            return false;
        }

        self.committed = cursor.location();
        if let Some(error) = scanned.error {
            debug!(%error, "recovered");
            self.errors.push(error);
        }
        self.event = Some(scanned.event);
        self.compact();
        true
    }

    /// Event produced by the last successful `advance`.
    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn take_event(&mut self) -> Option<Event> {
        self.event.take()
    }

    /// `advance` and take the event in one step.
    pub fn next_event(&mut self) -> Option<Event> {
        if self.advance() {
            self.take_event()
        } else {
            None
        }
    }

    /// First error in document order.
    pub fn error(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Every error recovered so far, in document order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Location after the last committed unit.
    pub fn location(&self) -> Location {
        self.committed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closed and fully consumed: no further events can appear unless more
    /// bytes are fed.
    pub fn is_exhausted(&self) -> bool {
        self.closed && self.buffered() == 0
    }

    /// Bytes fed but not yet committed.
    pub fn buffered(&self) -> usize {
        self.base + self.buffer.len() - self.committed.offset
    }

    /// Drop the consumed prefix once it passes the configured low-water mark.
    fn compact(&mut self) {
        let Some(threshold) = self.options.get_compact_threshold() else {
            return;
        };
        let consumed = self.committed.offset - self.base;
        if consumed < threshold {
            return;
        }
        self.buffer.drain(..consumed);
        self.base += consumed;
        trace!(discarded = consumed, base = self.base, "compacted");
    }
}

/// Drains whatever events are available right now.
///
/// On an open session iteration stops at the first partial unit; it can be
/// resumed after more bytes are fed.
impl Iterator for Session {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}
