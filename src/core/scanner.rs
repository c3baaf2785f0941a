//! Byte cursor over the document
//!
//! The markup scanner walks the document byte by byte while it is inside a
//! tag or tokenising text. Text outside the analysed scope is skipped up to
//! the next `<` with memchr.

use memchr::{memchr, memchr_iter};

/// Position in the document, advanced one byte at a time inside tags and
/// analysed text, or a whole text run at a time outside them
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Cursor { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte under the cursor, `None` at end of input
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Offset of the next `<` at or after the cursor
    #[inline]
    pub fn next_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Move to the next `<`, or to the end of input, returning the number of
    /// newlines skipped over
    pub fn skip_text(&mut self) -> usize {
        let end = self.next_tag_start().unwrap_or(self.input.len());
        let lines = memchr_iter(b'\n', &self.input[self.pos..end]).count();
        self.pos = end;
        lines
    }
}

/// First byte of an element or attribute name. Non-ASCII bytes are accepted
/// so UTF-8 names pass through.
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Any later byte of a name
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}
