//! Markup Scanner
//!
//! Two passes over the same buffer, driven by the same traversal code:
//!
//! 1. **Counting**: tags are classified and text is split into words, but
//!    nothing is stored; every recognised word bumps a counter.
//! 2. **Reading**: exactly `count + 1` token slots are reserved, the walk is
//!    repeated and each word is written into a slot and handed to the
//!    [`TokenSink`]. The last slot is the epilogue.
//!
//! Malformed markup never fails a scan: a `<` that does not open a tag, and
//! a tag still open at end of input, are read as literal text.

pub mod crumbs;
pub mod emit;
pub mod options;

pub use crumbs::ElementStack;
pub use emit::Reemitter;
pub use options::{AttributeTarget, ScanOptions, Scope};

use crate::core::scanner::Cursor;
use crate::core::tagger::{TagClassifier, TagEvents, TagState};
use crate::core::words::WordSplitter;
use crate::document::{Document, Span, Token, TokenSequence, WordSource};
use crate::error::{ScanError, ScanResult};

/// Receives every finalised token during the reading pass
pub trait TokenSink {
    /// A word with no part of speech attached
    fn insert(&mut self, word: &[u8]);

    /// A word whose part of speech came from an attribute
    fn insert_tagged(&mut self, word: &[u8], pos: &[u8]);
}

/// Discards everything
impl TokenSink for () {
    #[inline]
    fn insert(&mut self, _word: &[u8]) {}

    #[inline]
    fn insert_tagged(&mut self, _word: &[u8], _pos: &[u8]) {}
}

/// Two-pass markup scanner
#[derive(Debug, Clone, Copy)]
pub struct MarkupScanner<'o> {
    options: &'o ScanOptions,
}

impl<'o> MarkupScanner<'o> {
    pub fn new(options: &'o ScanOptions) -> Self {
        if options.element.is_some() && options.ancestor.is_some() {
            tracing::warn!("both element and ancestor configured; only elements inside the ancestor are analysed");
        }
        MarkupScanner { options }
    }

    /// Counting pass: number of tokens the reading pass will produce
    pub fn count<W: WordSplitter + ?Sized>(&self, doc: &Document, words: &mut W) -> usize {
        let mut sink = ();
        let mut pass = Pass::new(doc.bytes(), self.options, &mut sink, None);
        pass.run(words);
        pass.count
    }

    /// Scan a document into tokens, reporting each one to `sink`
    pub fn scan<S, W>(&self, doc: &Document, sink: &mut S, words: &mut W) -> ScanResult<TokenSequence>
    where
        S: TokenSink + ?Sized,
        W: WordSplitter + ?Sized,
    {
        let counted = self.count(doc, words);
        let slots = counted + 1;
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(slots)
            .map_err(|source| ScanError::Allocation { slots, source })?;

        let mut pass = Pass::new(doc.bytes(), self.options, sink, Some(storage));
        pass.run(words);
        let mut tokens = pass.tokens.unwrap_or_default();
        if tokens.len() != counted {
            return Err(ScanError::PassMismatch {
                counted,
                read: tokens.len(),
            });
        }
        tokens.push(Token::epilogue(doc.len()));
        tracing::debug!(tokens = counted, lines = words.line_number(), "scan complete");
        Ok(TokenSequence::from_slots(tokens))
    }
}

/// State of one traversal. The counting pass has no storage and a no-op
/// sink; everything else is shared between the passes.
struct Pass<'a, 's, S: TokenSink + ?Sized> {
    input: &'a [u8],
    options: &'a ScanOptions,
    scope: Scope<'a>,
    tracking: bool,
    stack: ElementStack,
    /// Token being assembled from attribute values
    pending: Token,
    /// Configured attribute whose value comes next
    target: Option<AttributeTarget>,
    /// Attributes of the current start tag are being collected
    collecting: bool,
    /// Name of the start tag being read, for `<name/>`
    open_name: Span,
    /// A segment element opened and no token has been finalised since
    segment_pending: bool,
    /// The element's word came from an attribute, so its text is skipped
    claimed: bool,
    count: usize,
    tokens: Option<Vec<Token>>,
    sink: &'s mut S,
}

impl<'a, 's, S: TokenSink + ?Sized> Pass<'a, 's, S> {
    fn new(
        input: &'a [u8],
        options: &'a ScanOptions,
        sink: &'s mut S,
        tokens: Option<Vec<Token>>,
    ) -> Self {
        Pass {
            input,
            options,
            scope: options.scope(),
            tracking: options.tracks_elements(),
            stack: ElementStack::new(),
            pending: Token::default(),
            target: None,
            collecting: false,
            open_name: Span::empty(),
            segment_pending: false,
            claimed: false,
            count: 0,
            tokens,
            sink,
        }
    }

    /// Whether text and attributes at the current position are analysed
    fn should_analyze(&self) -> bool {
        match self.scope {
            Scope::Element(name) => self.stack.innermost_is(self.input, name),
            Scope::Ancestor(_) => !self.stack.is_empty(),
            Scope::Unconstrained => true,
        }
    }

    /// Walk the whole input. Returns the number of elements still open at
    /// the end, which are then dropped.
    fn run<W: WordSplitter + ?Sized>(&mut self, words: &mut W) -> usize {
        let input = self.input;
        let mut classifier = TagClassifier::new();
        let mut cursor = Cursor::new(input);
        words.reset();

        // A text run is open and being fed to the splitter
        let mut analysing = self.begin_text(words);
        // `analysing` was true when the current `<` was read; the run stays
        // open until the tag is known to be real
        let mut held = false;
        let mut tag_start = 0;
        // Newlines inside the current tag, reported once the tag is known
        // not to be re-read as text
        let mut tag_lines = 0;

        while let Some(byte) = cursor.peek() {
            let pos = cursor.position();
            if !analysing && !classifier.in_tag() && byte != b'<' {
                words.skip_lines(cursor.skip_text());
                continue;
            }
            match classifier.step(byte, pos, self) {
                TagState::Text => {
                    if let Some(word) = words.feed(byte, pos) {
                        self.text_token(word);
                    }
                }
                TagState::TagStart => {
                    held = analysing;
                    tag_start = pos;
                    tag_lines = 0;
                }
                TagState::Tag => {
                    if byte == b'\n' {
                        tag_lines += 1;
                    }
                    if held && classifier.committed() {
                        held = false;
                        analysing = false;
                        if let Some(word) = words.finish_run(tag_start) {
                            self.text_token(word);
                        }
                    }
                }
                TagState::TagEnd => {
                    words.skip_lines(tag_lines);
                    analysing = self.begin_text(words);
                }
                TagState::Rejected => {
                    // Not a tag: the `<...` run is text, and the byte that
                    // gave it away is classified again as text
                    if held {
                        held = false;
                        self.feed_text(words, tag_start, pos);
                    } else {
                        analysing = self.begin_text(words);
                        if analysing {
                            self.feed_text(words, tag_start, pos);
                        }
                    }
                    continue;
                }
            }
            cursor.advance(1);
        }

        if classifier.in_tag() {
            // Unterminated tag
            if !held {
                analysing = self.begin_text(words);
            }
            if analysing {
                self.feed_text(words, tag_start, input.len());
            } else {
                words.skip_lines(tag_lines);
            }
        }
        if analysing {
            if let Some(word) = words.finish_run(input.len()) {
                self.text_token(word);
            }
        }

        let unclosed = self.stack.drain();
        if unclosed > 0 {
            tracing::debug!(unclosed, "elements left open at end of document");
        }
        unclosed
    }

    /// Open a text run if the text after the current position is analysed
    fn begin_text<W: WordSplitter + ?Sized>(&mut self, words: &mut W) -> bool {
        let analysing = !self.claimed && self.should_analyze();
        if analysing {
            words.begin_run();
        }
        analysing
    }

    fn feed_text<W: WordSplitter + ?Sized>(&mut self, words: &mut W, start: usize, end: usize) {
        for pos in start..end {
            if let Some(word) = words.feed(self.input[pos], pos) {
                self.text_token(word);
            }
        }
    }

    fn text_token(&mut self, word: Span) {
        self.finalise(word, word, WordSource::Text);
    }

    /// Complete the pending token with its word and hand it on
    fn finalise(&mut self, word: Span, extent: Span, source: WordSource) {
        let mut token = std::mem::take(&mut self.pending);
        token.word = word;
        token.extent = extent;
        token.source = source;
        token.segment_start = std::mem::take(&mut self.segment_pending);
        self.count += 1;

        if let Some(tokens) = self.tokens.as_mut() {
            let word = token.word(self.input);
            match token.pos(self.input) {
                Some(pos) => self.sink.insert_tagged(word, pos),
                None => self.sink.insert(word),
            }
            tokens.push(token);
        }
    }

    fn open_element(&mut self, name: Span) {
        // Lazy push: nothing is tracked until the ancestor opens, also when
        // an element name narrows the scope further
        let push = match self.options.ancestor.as_deref() {
            Some(ancestor) => !self.stack.is_empty() || name.matches(self.input, ancestor),
            None => true,
        };
        if !push {
            return;
        }
        self.stack.push(name);
        if let Some(segment) = self.options.segment.as_deref() {
            if self.stack.innermost_is(self.input, segment) {
                self.segment_pending = true;
            }
        }
    }
}

impl<S: TokenSink + ?Sized> TagEvents for Pass<'_, '_, S> {
    fn element_name(&mut self, name: Span, closing: bool) {
        // Attribute values belong to the element whose tag carried them
        self.pending = Token::default();
        self.target = None;
        self.claimed = false;
        self.collecting = false;

        if closing {
            if self.tracking {
                self.stack.close(self.input, name);
            }
            return;
        }
        if self.tracking {
            self.open_element(name);
        }
        self.open_name = name;
        self.collecting = self.options.uses_attributes() && self.should_analyze();
    }

    fn attribute_name(&mut self, name: Span) {
        self.target = if self.collecting {
            self.options.attribute_target(name.slice(self.input))
        } else {
            None
        };
    }

    fn attribute_value(&mut self, value: Span) {
        let Some(target) = self.target.take() else {
            return;
        };
        match target {
            AttributeTarget::Word => self.pending.word = value,
            AttributeTarget::Pos => self.pending.pos = value,
            AttributeTarget::Lemma => self.pending.lemma = value,
            AttributeTarget::LemmaClass => self.pending.lemma_class = value,
        }
    }

    fn attributes_done(&mut self) {
        self.target = None;
        if !self.collecting {
            return;
        }
        self.collecting = false;
        let word = self.pending.word;
        if !word.is_empty() {
            self.finalise(word, word, WordSource::Attribute);
            self.claimed = true;
        }
    }

    fn empty_element(&mut self) {
        if self.tracking {
            self.stack.close(self.input, self.open_name);
        }
        self.pending = Token::default();
        self.claimed = false;
    }
}
