//! Byte cursor with line/column tracking.
//!
//! Pure mechanism: the cursor knows nothing about markup. Every read is
//! prefix-only, it never looks past the bytes it was given. When a read
//! stops because those bytes ran out (rather than because it found what it
//! was looking for), the cursor remembers it in [`Cursor::touched_end`], which
//! is how the session tells a finished unit from one that may still grow.

use memchr::{memchr, memchr_iter, memmem};
use unicode_xid::UnicodeXID;

use crate::error::ErrorCode;
use crate::span::Location;

/// Returned by [`Cursor::read_until`] when the delimiter is not found.
///
/// The partial text has been consumed; the cursor sits at the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unterminated<'a> {
    pub partial: &'a [u8],
}

/// Classification of the character at some position, for name scanning.
enum NameChar {
    /// Valid name character of this many bytes
    Valid(usize),
    Invalid,
    /// Ran out of bytes (possibly mid-way through a UTF-8 sequence)
    Truncated,
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    /// Absolute stream offset of `input[0]`
    base: usize,
    line: u32,
    column: u32,
    touched_end: bool,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of a complete input.
    pub fn new(input: &'a [u8]) -> Self {
        Self::resume(input, 0, Location::START)
    }

    /// Cursor over `input` whose first byte sits at absolute offset `base`,
    /// positioned at `at`.
    ///
    /// `at.offset` must fall within `base..=base + input.len()`.
    pub fn resume(input: &'a [u8], base: usize, at: Location) -> Self {
        let pos = at.offset.saturating_sub(base).min(input.len());
        Self {
            input,
            pos,
            base,
            line: at.line,
            column: at.column,
            touched_end: false,
        }
    }

    /// Current location (absolute offset, line, column).
    #[inline]
    pub fn location(&self) -> Location {
        Location {
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }

    /// Absolute stream offset of the current position.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Unread bytes.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Bytes consumed since `start` (an earlier [`Cursor::offset`]).
    #[inline]
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.input[start - self.base..self.pos]
    }

    /// True once any operation stopped because the input ran out.
    #[inline]
    pub fn touched_end(&self) -> bool {
        self.touched_end
    }

    /// Next byte without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<u8> {
        let byte = self.input.get(self.pos).copied();
        if byte.is_none() {
            self.touched_end = true;
        }
        byte
    }

    /// Consume one byte.
    #[inline]
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
        Some(byte)
    }

    /// Consume `n` bytes (clamped to what is available).
    pub fn advance_by(&mut self, n: usize) {
        let n = n.min(self.input.len() - self.pos);
        let bytes = &self.input[self.pos..self.pos + n];
        let mut newlines = 0u32;
        let mut last_newline = None;
        for idx in memchr_iter(b'\n', bytes) {
            newlines = newlines.saturating_add(1);
            last_newline = Some(idx);
        }
        match last_newline {
            Some(idx) => {
                self.line = self.line.saturating_add(newlines);
                self.column = u32::try_from(n - idx).unwrap_or(u32::MAX);
            }
            None => {
                let run = u32::try_from(n).unwrap_or(u32::MAX);
                self.column = self.column.saturating_add(run);
            }
        }
        self.pos += n;
    }

    /// Consume `byte` if it is next.
    #[inline]
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check whether the unread bytes begin with `prefix`.
    ///
    /// When the available bytes are a strict prefix of `prefix` the answer is
    /// `false` and the end is marked as touched: more input could change it.
    pub fn starts_with(&mut self, prefix: &[u8]) -> bool {
        let rest = self.remaining();
        if rest.len() >= prefix.len() {
            return rest.starts_with(prefix);
        }
        if prefix.starts_with(rest) {
            self.touched_end = true;
        }
        false
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !is_whitespace(byte) {
                break;
            }
            self.advance();
        }
    }

    /// Read a name, skipping leading whitespace.
    ///
    /// The first character must be a letter, `_` or `:`; later characters may
    /// also be digits, `-` or `.`. Non-ASCII letters follow Unicode XID rules.
    pub fn read_name(&mut self) -> Result<&'a [u8], ErrorCode> {
        self.skip_whitespace();
        let start = self.pos;

        match self.name_char(true) {
            NameChar::Valid(width) => self.advance_by(width),
            NameChar::Invalid => return Err(ErrorCode::InvalidName),
            NameChar::Truncated => {
                self.touched_end = true;
                return Err(ErrorCode::NameAtEndOfInput);
            }
        }

        loop {
            match self.name_char(false) {
                NameChar::Valid(width) => self.advance_by(width),
                NameChar::Invalid => break,
                NameChar::Truncated => {
                    self.touched_end = true;
                    break;
                }
            }
        }

        Ok(&self.input[start..self.pos])
    }

    /// Read up to `delimiter` and consume the delimiter too.
    ///
    /// If the input ends first, everything left is consumed and returned as
    /// the partial text of the error.
    pub fn read_until(&mut self, delimiter: &[u8]) -> Result<&'a [u8], Unterminated<'a>> {
        let rest = self.remaining();
        match memmem::find(rest, delimiter) {
            Some(idx) => {
                self.advance_by(idx + delimiter.len());
                Ok(&rest[..idx])
            }
            None => {
                self.advance_by(rest.len());
                self.touched_end = true;
                Err(Unterminated { partial: rest })
            }
        }
    }

    /// Read up to (not including) `byte`, or to the end of input.
    pub fn read_until_byte(&mut self, byte: u8) -> &'a [u8] {
        let rest = self.remaining();
        let len = match memchr(byte, rest) {
            Some(idx) => idx,
            None => {
                self.touched_end = true;
                rest.len()
            }
        };
        self.advance_by(len);
        &rest[..len]
    }

    fn name_char(&self, first: bool) -> NameChar {
        let rest = self.remaining();
        let Some(&lead) = rest.first() else {
            return NameChar::Truncated;
        };

        if lead.is_ascii() {
            let valid = lead.is_ascii_alphabetic()
                || lead == b'_'
                || lead == b':'
                || (!first && (lead.is_ascii_digit() || lead == b'-' || lead == b'.'));
            return if valid {
                NameChar::Valid(1)
            } else {
                NameChar::Invalid
            };
        }

        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return NameChar::Invalid,
        };
        if rest.len() < width {
            return NameChar::Truncated;
        }
        let Some(ch) = std::str::from_utf8(&rest[..width])
            .ok()
            .and_then(|s| s.chars().next())
        else {
            return NameChar::Invalid;
        };

        let valid = if first {
            ch.is_xid_start()
        } else {
            ch.is_xid_continue()
        };
        if valid {
            NameChar::Valid(width)
        } else {
            NameChar::Invalid
        }
    }
}

/// XML whitespace: space, tab, carriage return, line feed.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}
