//! Span - offset and length into the document buffer
//!
//! Zero-copy reference to a portion of the input document. Used for element
//! names, attribute names/values, words and token extents.

/// A span referencing a portion of the input document.
///
/// Size: 8 bytes (offset: 4 bytes, len: 4 bytes). A zero length means
/// "unset": an attribute that was never seen, or a word not yet read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct Span {
    /// Byte offset into the document
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create an empty span (used for "no value")
    #[inline]
    pub const fn empty() -> Self {
        Self { offset: 0, len: 0 }
    }

    /// Create an empty span positioned at `offset`
    #[inline]
    pub const fn at(offset: usize) -> Self {
        Self {
            offset: offset as u32,
            len: 0,
        }
    }

    /// Span covering `start..end`. Callers keep positions inside a
    /// [`Document`](super::Document), whose length fits in `u32`.
    #[inline]
    pub const fn between(start: usize, end: usize) -> Self {
        Self {
            offset: start as u32,
            len: end.saturating_sub(start) as u32,
        }
    }

    /// Span covering `start..end`, or `None` if the range is inverted or
    /// runs past `input_len`.
    pub fn checked(start: usize, end: usize, input_len: usize) -> Option<Self> {
        if start > end || end > input_len || end > u32::MAX as usize {
            return None;
        }
        Some(Self::between(start, end))
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start offset as usize
    #[inline]
    pub const fn start(&self) -> usize {
        self.offset as usize
    }

    /// End offset (exclusive)
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// Extract the byte slice from input
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        input.get(self.start()..self.end()).unwrap_or(&[])
    }

    /// Extract as UTF-8 string from input
    #[inline]
    pub fn as_str<'a>(&self, input: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(input)).ok()
    }

    /// Compare two spans by the bytes they cover, not by position
    #[inline]
    pub fn same_text(&self, other: &Span, input: &[u8]) -> bool {
        self.len == other.len && self.slice(input) == other.slice(input)
    }

    /// Check whether the covered bytes equal `name`
    #[inline]
    pub fn matches(&self, input: &[u8], name: &[u8]) -> bool {
        self.len as usize == name.len() && self.slice(input) == name
    }

    /// `Some(self)` unless empty
    #[inline]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(5, 10);
        assert_eq!(span.start(), 5);
        assert_eq!(span.end(), 15);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_empty() {
        let span = Span::empty();
        assert!(span.is_empty());
        assert_eq!(span.non_empty(), None);
        assert!(Span::at(7).is_empty());
    }

    #[test]
    fn test_span_slice() {
        let input = b"hello world";
        let span = Span::between(6, 11);
        assert_eq!(span.slice(input), b"world");
        assert_eq!(span.as_str(input), Some("world"));
    }

    #[test]
    fn test_span_slice_out_of_bounds_is_empty() {
        let input = b"short";
        assert_eq!(Span::new(3, 10).slice(input), b"");
    }

    #[test]
    fn test_span_checked() {
        assert_eq!(Span::checked(2, 4, 10), Some(Span::new(2, 2)));
        assert_eq!(Span::checked(4, 2, 10), None);
        assert_eq!(Span::checked(2, 11, 10), None);
    }

    #[test]
    fn test_same_text_compares_content() {
        let input = b"dog cat dog";
        let first = Span::between(0, 3);
        let last = Span::between(8, 11);
        assert_ne!(first, last);
        assert!(first.same_text(&last, input));
        assert!(!first.same_text(&Span::between(4, 7), input));
    }

    #[test]
    fn test_matches_name() {
        let input = b"<lemma>";
        let span = Span::between(1, 6);
        assert!(span.matches(input, b"lemma"));
        assert!(!span.matches(input, b"lem"));
        assert!(!span.matches(input, b"lemmas"));
    }
}
