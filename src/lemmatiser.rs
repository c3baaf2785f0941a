//! Lemmatiser sessions
//!
//! A [`Lemmatiser`] holds the configuration and the compiled output format.
//! Documents are processed through a [`Session`], of which at most one is
//! active per lemmatiser at a time. Lemmas come from a [`LemmaSource`];
//! [`Lexicon`] is a simple in-memory one.

use crate::core::words::{PlainWords, Punctuation};
use crate::document::{Document, Token};
use crate::error::{LemmaError, Result};
use crate::format::{Candidate, FormatTree};
use crate::scan::{MarkupScanner, Reemitter, ScanOptions, TokenSink};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Looks up everything known about a word
pub trait LemmaSource {
    /// `None` if the word is unknown
    fn candidate(&self, word: &[u8], pos: Option<&[u8]>) -> Option<Candidate>;
}

/// Dictionary entry for one word form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexiconEntry {
    pub lemmas: Vec<Vec<u8>>,
    pub classes: Vec<Vec<u8>>,
}

/// In-memory word form to lemma table
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<Vec<u8>, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, word: impl AsRef<[u8]>, lemmas: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.insert_with_classes(word, lemmas, std::iter::empty::<&[u8]>());
    }

    pub fn insert_with_classes<I, J>(&mut self, word: impl AsRef<[u8]>, lemmas: I, classes: J)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
        J: IntoIterator,
        J::Item: AsRef<[u8]>,
    {
        let entry = self.entries.entry(word.as_ref().to_vec()).or_default();
        entry
            .lemmas
            .extend(lemmas.into_iter().map(|l| l.as_ref().to_vec()));
        entry
            .classes
            .extend(classes.into_iter().map(|c| c.as_ref().to_vec()));
    }

    pub fn get(&self, word: &[u8]) -> Option<&LexiconEntry> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LemmaSource for Lexicon {
    fn candidate(&self, word: &[u8], pos: Option<&[u8]>) -> Option<Candidate> {
        self.entries.get(word).map(|entry| Candidate {
            word: word.to_vec(),
            tag: pos.unwrap_or_default().to_vec(),
            dict_lemmas: entry.lemmas.clone(),
            lemma_classes: entry.classes.clone(),
            ..Candidate::default()
        })
    }
}

/// Word counts over everything a session has processed
#[derive(Debug, Clone, Default)]
pub struct Tally {
    /// Tokens seen
    pub total: usize,
    /// Tokens not found in the lemma source
    pub unknown: usize,
    /// Tokens with more than one dictionary lemma
    pub ambiguous: usize,
    types: HashSet<Vec<u8>>,
    unknown_types: HashSet<Vec<u8>>,
}

impl Tally {
    /// Distinct word forms seen
    pub fn distinct(&self) -> usize {
        self.types.len()
    }

    /// Distinct word forms not found in the lemma source
    pub fn distinct_unknown(&self) -> usize {
        self.unknown_types.len()
    }

    fn record_lookup(&mut self, word: &[u8], found: Option<&Candidate>) {
        match found {
            Some(candidate) if candidate.dict_lemmas.len() > 1 => self.ambiguous += 1,
            Some(_) => {}
            None => {
                self.unknown += 1;
                if !self.unknown_types.contains(word) {
                    self.unknown_types.insert(word.to_vec());
                }
            }
        }
    }

    pub fn merge(&mut self, other: Tally) {
        self.total += other.total;
        self.unknown += other.unknown;
        self.ambiguous += other.ambiguous;
        self.types.extend(other.types);
        self.unknown_types.extend(other.unknown_types);
    }
}

impl TokenSink for Tally {
    fn insert(&mut self, word: &[u8]) {
        self.total += 1;
        if !self.types.contains(word) {
            self.types.insert(word.to_vec());
        }
    }

    fn insert_tagged(&mut self, word: &[u8], _pos: &[u8]) {
        self.insert(word);
    }
}

/// Lemmatiser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmatiserOptions {
    pub scan: ScanOptions,
    /// Output format written in place of each token
    pub format: String,
    /// Joins the values of multi-valued fields
    pub separator: String,
    pub punctuation: Punctuation,
    /// Render the format for words the lemma source does not know. When
    /// false they are copied unchanged.
    pub render_unknown: bool,
}

impl Default for LemmatiserOptions {
    fn default() -> Self {
        LemmatiserOptions {
            scan: ScanOptions::default(),
            format: "$b".to_string(),
            separator: "|".to_string(),
            punctuation: Punctuation::default(),
            render_unknown: false,
        }
    }
}

pub struct Lemmatiser {
    options: LemmatiserOptions,
    format: Arc<FormatTree>,
    active: AtomicBool,
}

impl Lemmatiser {
    /// Compile the output format. A bad format fails here, before any
    /// document is read.
    pub fn new(options: LemmatiserOptions) -> Result<Self> {
        let format = Arc::new(FormatTree::compile(&options.format)?);
        tracing::info!(format = %options.format, "lemmatiser ready");
        Ok(Self::with_format(options, format))
    }

    /// Use an already compiled format instead of `options.format`
    pub fn with_format(options: LemmatiserOptions, format: Arc<FormatTree>) -> Self {
        Lemmatiser {
            options,
            format,
            active: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &LemmatiserOptions {
        &self.options
    }

    pub fn format(&self) -> &FormatTree {
        &self.format
    }

    /// Start a session. Fails if another one is still active.
    pub fn session(&self) -> Result<Session<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LemmaError::SessionActive)?;
        tracing::debug!("lemmatiser session started");
        Ok(Session {
            lemmatiser: self,
            tally: Tally::default(),
        })
    }

    /// Scan, look up and write back one document
    pub(crate) fn lemmatise_document<L: LemmaSource + ?Sized>(
        &self,
        input: &[u8],
        source: &L,
        tally: &mut Tally,
    ) -> Result<Vec<u8>> {
        let doc = Document::from_slice(input)?;
        let mut words = PlainWords::new(self.options.punctuation);
        let tokens = MarkupScanner::new(&self.options.scan).scan(&doc, tally, &mut words)?;

        let mut outputs = Vec::with_capacity(tokens.len());
        for token in tokens.tokens() {
            outputs.push(self.candidate(&doc, token, source, tally));
        }

        let mut out = Vec::with_capacity(doc.len());
        Reemitter::new(&doc, &tokens).write(&self.format, &outputs, &mut out)?;
        Ok(out)
    }

    fn candidate<L: LemmaSource + ?Sized>(
        &self,
        doc: &Document,
        token: &Token,
        source: &L,
        tally: &mut Tally,
    ) -> Option<Candidate> {
        let word = token.word(doc.bytes());
        let pos = token.pos(doc.bytes());
        let found = source.candidate(word, pos);
        tally.record_lookup(word, found.as_ref());
        let candidate = match found {
            Some(candidate) => candidate,
            None if self.options.render_unknown => {
                Candidate::new(word).with_tag(pos.unwrap_or_default())
            }
            None => return None,
        };
        Some(candidate.with_separator(&self.options.separator))
    }
}

/// Exclusive use of a [`Lemmatiser`], ended by dropping it
pub struct Session<'l> {
    lemmatiser: &'l Lemmatiser,
    tally: Tally,
}

impl<'l> Session<'l> {
    /// Lemmatise one document, returning the rewritten markup
    pub fn lemmatise<L: LemmaSource + ?Sized>(&mut self, input: &[u8], source: &L) -> Result<Vec<u8>> {
        self.lemmatiser
            .lemmatise_document(input, source, &mut self.tally)
    }

    pub fn lemmatiser(&self) -> &'l Lemmatiser {
        self.lemmatiser
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub(crate) fn tally_mut(&mut self) -> &mut Tally {
        &mut self.tally
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        tracing::debug!(
            words = self.tally.total,
            distinct = self.tally.distinct(),
            unknown = self.tally.unknown,
            ambiguous = self.tally.ambiguous,
            "lemmatiser session ended"
        );
        self.lemmatiser.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatSpecError;

    fn lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        lexicon.insert("dogs", ["dog"]);
        lexicon.insert_with_classes("saw", ["see", "saw"], ["V", "N"]);
        lexicon
    }

    fn options(format: &str) -> LemmatiserOptions {
        LemmatiserOptions {
            format: format.to_string(),
            ..LemmatiserOptions::default()
        }
    }

    #[test]
    fn test_bad_format_fails_before_any_document() {
        let err = Lemmatiser::new(options("[$b")).err().unwrap();
        assert!(matches!(
            err,
            LemmaError::Format(FormatSpecError::UnclosedGroup { offset: 0 })
        ));
    }

    #[test]
    fn test_lemmatise_text() {
        let lemmatiser = Lemmatiser::new(options("$w/$b")).unwrap();
        let mut session = lemmatiser.session().unwrap();
        let out = session
            .lemmatise(b"<s>dogs saw cats</s>", &lexicon())
            .unwrap();
        assert_eq!(out, b"<s>dogs/dog saw/see|saw cats</s>");

        let tally = session.tally();
        assert_eq!(tally.total, 3);
        assert_eq!(tally.distinct(), 3);
        assert_eq!(tally.unknown, 1);
        assert_eq!(tally.distinct_unknown(), 1);
        assert_eq!(tally.ambiguous, 1);
    }

    #[test]
    fn test_render_unknown_words() {
        let lemmatiser = Lemmatiser::new(LemmatiserOptions {
            render_unknown: true,
            ..options("$w[/$b]")
        })
        .unwrap();
        let mut session = lemmatiser.session().unwrap();
        let out = session.lemmatise(b"dogs cats", &lexicon()).unwrap();
        assert_eq!(out, b"dogs/dog cats");
    }

    #[test]
    fn test_lemma_attributes_filled() {
        let lemmatiser = Lemmatiser::new(LemmatiserOptions {
            scan: ScanOptions::new()
                .with_element("w")
                .with_lemma_attribute("lemma")
                .with_lemma_class_attribute("class"),
            separator: ", ".to_string(),
            ..options("$b")
        })
        .unwrap();
        let mut session = lemmatiser.session().unwrap();
        let out = session
            .lemmatise(b"<w lemma=\"\" class=\"\">saw</w>", &lexicon())
            .unwrap();
        // Empty attribute values are unset, so the text is replaced instead
        assert_eq!(out, b"<w lemma=\"\" class=\"\">see, saw</w>");

        let out = session
            .lemmatise(b"<w class=\"x\" lemma=\"x\">saw</w>", &lexicon())
            .unwrap();
        assert_eq!(out, b"<w class=\"V, N\" lemma=\"see, saw\">saw</w>");
    }

    #[test]
    fn test_single_active_session() {
        let lemmatiser = Lemmatiser::new(LemmatiserOptions::default()).unwrap();
        let session = lemmatiser.session().unwrap();
        assert!(matches!(lemmatiser.session(), Err(LemmaError::SessionActive)));
        drop(session);
        assert!(lemmatiser.session().is_ok());
    }

    #[test]
    fn test_tally_accumulates_across_documents() {
        let lemmatiser = Lemmatiser::new(LemmatiserOptions::default()).unwrap();
        let mut session = lemmatiser.session().unwrap();
        session.lemmatise(b"dogs", &lexicon()).unwrap();
        session.lemmatise(b"dogs cats", &lexicon()).unwrap();
        assert_eq!(session.tally().total, 3);
        assert_eq!(session.tally().distinct(), 2);
        assert_eq!(session.tally().unknown, 1);
    }

    #[test]
    fn test_tagged_lookup_carries_pos() {
        let lemmatiser = Lemmatiser::new(LemmatiserOptions {
            scan: ScanOptions::new()
                .with_word_attribute("form")
                .with_pos_attribute("pos"),
            ..options("$w_$t")
        })
        .unwrap();
        let mut session = lemmatiser.session().unwrap();
        let out = session
            .lemmatise(b"<t form=\"saw\" pos=\"V\"/>", &lexicon())
            .unwrap();
        assert_eq!(out, b"<t form=\"saw_V\" pos=\"V\"/>");
    }
}
