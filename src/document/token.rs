//! Tokens - one recognised word occurrence per record
//!
//! Tokens hold spans only; the bytes stay in the owning [`Document`].
//!
//! [`Document`]: super::Document

use super::span::Span;

/// Where a token's word was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordSource {
    /// Element text, split by the word tokenizer
    #[default]
    Text,
    /// The configured word attribute
    Attribute,
}

/// One recognised word occurrence.
///
/// Any of `word`, `pos`, `lemma` and `lemma_class` may be empty. `extent`
/// is the literal run that is replaced when output is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub word: Span,
    pub pos: Span,
    pub lemma: Span,
    pub lemma_class: Span,
    pub extent: Span,
    /// First token after a segment-break element opened
    pub segment_start: bool,
    pub source: WordSource,
}

impl Token {
    /// The trailing slot after the last real token. Its empty extent sits at
    /// the end of the buffer so the remainder flushes like any other gap.
    pub fn epilogue(input_len: usize) -> Self {
        Token {
            extent: Span::at(input_len),
            ..Token::default()
        }
    }

    /// Word bytes
    #[inline]
    pub fn word<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        self.word.slice(input)
    }

    /// Part-of-speech bytes, if an attribute supplied one
    #[inline]
    pub fn pos<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        self.pos.non_empty().map(|s| s.slice(input))
    }
}

/// Tokens in document order followed by one epilogue slot.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    slots: Vec<Token>,
}

impl TokenSequence {
    /// Wrap slots that already end with the epilogue
    pub(crate) fn from_slots(slots: Vec<Token>) -> Self {
        debug_assert!(!slots.is_empty());
        TokenSequence { slots }
    }

    /// Real tokens, without the epilogue
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.slots[..self.len()]
    }

    /// Real tokens plus the epilogue slot
    #[inline]
    pub fn slots(&self) -> &[Token] {
        &self.slots
    }

    /// The epilogue slot
    #[inline]
    pub fn epilogue(&self) -> &Token {
        &self.slots[self.len()]
    }

    /// Number of real tokens
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epilogue_sits_at_end() {
        let token = Token::epilogue(42);
        assert_eq!(token.extent.start(), 42);
        assert!(token.extent.is_empty());
        assert!(token.word.is_empty());
    }

    #[test]
    fn test_sequence_excludes_epilogue() {
        let word = Token {
            word: Span::new(0, 3),
            extent: Span::new(0, 3),
            ..Token::default()
        };
        let seq = TokenSequence::from_slots(vec![word, Token::epilogue(3)]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.tokens(), &[word]);
        assert_eq!(seq.slots().len(), 2);
        assert_eq!(seq.epilogue().extent.start(), 3);
    }

    #[test]
    fn test_pos_absent_when_unset() {
        let input = b"dog";
        let token = Token {
            word: Span::new(0, 3),
            ..Token::default()
        };
        assert_eq!(token.word(input), b"dog");
        assert_eq!(token.pos(input), None);
    }
}
