//! Word tokenizer
//!
//! The markup scanner hands every analysed text byte to a [`WordSplitter`],
//! which reports a word span each time a word boundary is reached. Text runs
//! are delimited by tags; the scanner opens a run with `begin_run` and closes
//! it with `finish_run`, which flushes a word cut short by the tag.

use crate::document::Span;

/// Splits text runs into words
pub trait WordSplitter {
    /// Start a new text run
    fn begin_run(&mut self);

    /// Feed the byte at `pos`. Returns the word that this byte completed,
    /// if any.
    fn feed(&mut self, byte: u8, pos: usize) -> Option<Span>;

    /// The run ended at `pos` (a tag or end of input). Returns the word that
    /// was still open, if any.
    fn finish_run(&mut self, pos: usize) -> Option<Span>;

    /// Number of newlines seen so far
    fn line_number(&self) -> usize;

    /// Account for newlines in text that was skipped without being fed
    fn skip_lines(&mut self, lines: usize);

    /// Forget all state, ready for another pass over a document
    fn reset(&mut self);
}

/// What to do with ASCII punctuation inside text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Punctuation {
    /// Punctuation is part of the surrounding word
    #[default]
    Keep,
    /// Every punctuation byte is a word of its own
    Separate,
    /// Punctuation separates words and is not a word itself
    Ignore,
}

impl Punctuation {
    /// Parse the option names `keep`, `separate` and `ignore`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "keep" => Some(Punctuation::Keep),
            "separate" => Some(Punctuation::Separate),
            "ignore" => Some(Punctuation::Ignore),
            _ => None,
        }
    }
}

/// Whitespace tokenizer with configurable punctuation handling
#[derive(Debug, Clone, Default)]
pub struct PlainWords {
    punctuation: Punctuation,
    word_start: Option<usize>,
    /// The open word is a single punctuation byte (`Separate` mode)
    open_is_punct: bool,
    lines: usize,
}

impl PlainWords {
    pub fn new(punctuation: Punctuation) -> Self {
        PlainWords {
            punctuation,
            ..PlainWords::default()
        }
    }

    /// Close the open word at `end`
    #[inline]
    fn close(&mut self, end: usize) -> Option<Span> {
        self.open_is_punct = false;
        self.word_start.take().map(|start| Span::between(start, end))
    }
}

impl WordSplitter for PlainWords {
    fn begin_run(&mut self) {
        self.word_start = None;
        self.open_is_punct = false;
    }

    fn feed(&mut self, byte: u8, pos: usize) -> Option<Span> {
        if byte == b'\n' {
            self.lines += 1;
        }
        if byte.is_ascii_whitespace() {
            return self.close(pos);
        }
        if byte.is_ascii_punctuation() {
            return match self.punctuation {
                Punctuation::Keep => {
                    self.word_start.get_or_insert(pos);
                    None
                }
                Punctuation::Ignore => self.close(pos),
                Punctuation::Separate => {
                    let done = self.close(pos);
                    self.word_start = Some(pos);
                    self.open_is_punct = true;
                    done
                }
            };
        }
        if self.open_is_punct {
            let done = self.close(pos);
            self.word_start = Some(pos);
            return done;
        }
        self.word_start.get_or_insert(pos);
        None
    }

    fn finish_run(&mut self, pos: usize) -> Option<Span> {
        self.close(pos)
    }

    fn line_number(&self) -> usize {
        self.lines
    }

    fn skip_lines(&mut self, lines: usize) {
        self.lines += lines;
    }

    fn reset(&mut self) {
        self.word_start = None;
        self.open_is_punct = false;
        self.lines = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn split(input: &[u8], punctuation: Punctuation) -> Vec<String> {
        let mut words = PlainWords::new(punctuation);
        words.begin_run();
        let mut spans: Vec<Span> = input
            .iter()
            .enumerate()
            .filter_map(|(pos, &b)| words.feed(b, pos))
            .collect();
        spans.extend(words.finish_run(input.len()));
        spans
            .iter()
            .map(|s| String::from_utf8_lossy(s.slice(input)).into_owned())
            .collect()
    }

    #[rstest]
    #[case(Punctuation::Keep, vec!["The", "dog,", "barked."])]
    #[case(Punctuation::Separate, vec!["The", "dog", ",", "barked", "."])]
    #[case(Punctuation::Ignore, vec!["The", "dog", "barked"])]
    fn test_punctuation_modes(#[case] mode: Punctuation, #[case] expected: Vec<&str>) {
        assert_eq!(split(b"The dog, barked.", mode), expected);
    }

    #[test]
    fn test_separate_consecutive_punctuation() {
        assert_eq!(split(b"wait...", Punctuation::Separate), vec!["wait", ".", ".", "."]);
    }

    #[test]
    fn test_utf8_bytes_stay_in_word() {
        assert_eq!(split("smörgås bord".as_bytes(), Punctuation::Keep), vec!["smörgås", "bord"]);
    }

    #[test]
    fn test_line_count_and_reset() {
        let mut words = PlainWords::new(Punctuation::Keep);
        words.begin_run();
        for (pos, &b) in b"a\nb\nc".iter().enumerate() {
            words.feed(b, pos);
        }
        assert_eq!(words.line_number(), 2);
        words.skip_lines(3);
        assert_eq!(words.line_number(), 5);
        words.reset();
        assert_eq!(words.line_number(), 0);
    }

    #[test]
    fn test_begin_run_drops_open_word() {
        let mut words = PlainWords::new(Punctuation::Keep);
        words.begin_run();
        words.feed(b'a', 0);
        words.begin_run();
        assert_eq!(words.finish_run(1), None);
    }

    #[test]
    fn test_punctuation_from_name() {
        assert_eq!(Punctuation::from_name("separate"), Some(Punctuation::Separate));
        assert_eq!(Punctuation::from_name("bogus"), None);
    }
}
