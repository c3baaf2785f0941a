//! Tag Classifier
//!
//! A byte-at-a-time state machine that tells the markup scanner whether the
//! current byte is text or belongs to a tag, and raises structural events
//! (element names, attribute names and values, end of attributes, empty
//! elements) through the [`TagEvents`] trait while it walks a tag.
//!
//! A `<` that is not followed by something tag-like (a name, `/name`, `!` or
//! `?`) is rejected, and the scanner re-reads the run as literal text.
//! Comments, declarations and processing instructions are consumed as tags
//! but raise no events.

use super::scanner::{is_name_char, is_name_start_char};
use crate::document::Span;

/// Structural events raised inside a tag
///
/// Spans are passed instead of copies; the receiver resolves them against
/// the document it is scanning.
pub trait TagEvents {
    /// An element name ended. `closing` is true for `</name>`.
    fn element_name(&mut self, name: Span, closing: bool);

    /// An attribute name ended
    fn attribute_name(&mut self, name: Span);

    /// An attribute value ended (quotes excluded)
    fn attribute_value(&mut self, value: Span);

    /// The attribute list of a start tag is complete
    fn attributes_done(&mut self);

    /// The start tag just completed was self-closing (`<name/>`)
    fn empty_element(&mut self);
}

/// Classification of one input byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    /// Byte is text
    Text,
    /// Byte is the `<` that may open a tag
    TagStart,
    /// Byte belongs to a tag
    Tag,
    /// Byte is the `>` closing a tag
    TagEnd,
    /// The tag opened at the last `TagStart` is not a tag after all. The
    /// byte was not consumed; the classifier is back in text mode.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Text,
    /// Just read `<`
    Open,
    /// Just read `</`
    ClosingOpen,
    ElementName { start: usize },
    /// Between attributes
    InTag,
    AttributeName { start: usize },
    AfterAttributeName,
    BeforeValue,
    QuotedValue { quote: u8, start: usize },
    UnquotedValue { start: usize },
    /// Read `/` inside a start tag
    Slash,
    /// Stray quoted run inside a tag, skipped so its `>` does not end the tag
    Junk { quote: u8 },
    /// Just read `<!`
    Bang,
    /// `<!-` read, one more `-` opens a comment
    BangDash,
    /// Inside `<!-- ... -->`; counts trailing dashes
    Comment { dashes: u8 },
    /// `<!DOCTYPE ...>`, `<?pi ...?>` and friends
    Declaration,
}

/// Byte-driven tag classifier
#[derive(Debug, Clone)]
pub struct TagClassifier {
    phase: Phase,
    closing: bool,
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TagClassifier {
    pub fn new() -> Self {
        TagClassifier {
            phase: Phase::Text,
            closing: false,
        }
    }

    /// True while a tag has been opened but not yet closed
    #[inline]
    pub fn in_tag(&self) -> bool {
        self.phase != Phase::Text
    }

    /// True once the bytes after `<` can no longer be rejected
    #[inline]
    pub fn committed(&self) -> bool {
        !matches!(self.phase, Phase::Text | Phase::Open | Phase::ClosingOpen)
    }

    /// Forget any partially read tag
    #[inline]
    pub fn reset(&mut self) {
        self.phase = Phase::Text;
        self.closing = false;
    }

    /// Classify the byte at `pos`, raising events on `events`
    pub fn step<E: TagEvents>(&mut self, byte: u8, pos: usize, events: &mut E) -> TagState {
        match self.phase {
            Phase::Text => {
                if byte == b'<' {
                    self.phase = Phase::Open;
                    self.closing = false;
                    TagState::TagStart
                } else {
                    TagState::Text
                }
            }
            Phase::Open => match byte {
                b'/' => {
                    self.phase = Phase::ClosingOpen;
                    TagState::Tag
                }
                b'!' => {
                    self.phase = Phase::Bang;
                    TagState::Tag
                }
                b'?' => {
                    self.phase = Phase::Declaration;
                    TagState::Tag
                }
                b if is_name_start_char(b) => {
                    self.phase = Phase::ElementName { start: pos };
                    TagState::Tag
                }
                _ => self.reject(),
            },
            Phase::ClosingOpen => {
                if is_name_start_char(byte) {
                    self.closing = true;
                    self.phase = Phase::ElementName { start: pos };
                    TagState::Tag
                } else {
                    self.reject()
                }
            }
            Phase::ElementName { start } => {
                if is_name_char(byte) {
                    return TagState::Tag;
                }
                events.element_name(Span::between(start, pos), self.closing);
                self.phase = Phase::InTag;
                self.between_attributes(byte, pos, events)
            }
            Phase::InTag => self.between_attributes(byte, pos, events),
            Phase::AttributeName { start } => {
                if is_name_char(byte) {
                    return TagState::Tag;
                }
                if !self.closing {
                    events.attribute_name(Span::between(start, pos));
                }
                match byte {
                    b'=' => {
                        self.phase = Phase::BeforeValue;
                        TagState::Tag
                    }
                    b if b.is_ascii_whitespace() => {
                        self.phase = Phase::AfterAttributeName;
                        TagState::Tag
                    }
                    _ => {
                        self.phase = Phase::InTag;
                        self.between_attributes(byte, pos, events)
                    }
                }
            }
            Phase::AfterAttributeName => match byte {
                b'=' => {
                    self.phase = Phase::BeforeValue;
                    TagState::Tag
                }
                b if b.is_ascii_whitespace() => TagState::Tag,
                _ => {
                    self.phase = Phase::InTag;
                    self.between_attributes(byte, pos, events)
                }
            },
            Phase::BeforeValue => match byte {
                b'"' | b'\'' => {
                    self.phase = Phase::QuotedValue {
                        quote: byte,
                        start: pos + 1,
                    };
                    TagState::Tag
                }
                b if b.is_ascii_whitespace() => TagState::Tag,
                b'>' => {
                    self.phase = Phase::InTag;
                    self.between_attributes(byte, pos, events)
                }
                _ => {
                    self.phase = Phase::UnquotedValue { start: pos };
                    TagState::Tag
                }
            },
            Phase::QuotedValue { quote, start } => {
                if byte == quote {
                    if !self.closing {
                        events.attribute_value(Span::between(start, pos));
                    }
                    self.phase = Phase::InTag;
                }
                TagState::Tag
            }
            Phase::UnquotedValue { start } => {
                if byte.is_ascii_whitespace() || byte == b'>' {
                    if !self.closing {
                        events.attribute_value(Span::between(start, pos));
                    }
                    self.phase = Phase::InTag;
                    self.between_attributes(byte, pos, events)
                } else {
                    TagState::Tag
                }
            }
            Phase::Slash => {
                if byte == b'>' {
                    self.phase = Phase::Text;
                    if !self.closing {
                        events.attributes_done();
                        events.empty_element();
                    }
                    TagState::TagEnd
                } else {
                    self.phase = Phase::InTag;
                    self.between_attributes(byte, pos, events)
                }
            }
            Phase::Junk { quote } => {
                if byte == quote {
                    self.phase = Phase::InTag;
                }
                TagState::Tag
            }
            Phase::Bang => {
                self.phase = if byte == b'-' {
                    Phase::BangDash
                } else {
                    Phase::Declaration
                };
                self.finish_declaration(byte)
            }
            Phase::BangDash => {
                self.phase = if byte == b'-' {
                    Phase::Comment { dashes: 0 }
                } else {
                    Phase::Declaration
                };
                self.finish_declaration(byte)
            }
            Phase::Comment { dashes } => match byte {
                b'-' => {
                    self.phase = Phase::Comment {
                        dashes: dashes.saturating_add(1),
                    };
                    TagState::Tag
                }
                b'>' if dashes >= 2 => {
                    self.phase = Phase::Text;
                    TagState::TagEnd
                }
                _ => {
                    self.phase = Phase::Comment { dashes: 0 };
                    TagState::Tag
                }
            },
            Phase::Declaration => self.finish_declaration(byte),
        }
    }

    /// Handle a byte between attributes
    fn between_attributes<E: TagEvents>(&mut self, byte: u8, pos: usize, events: &mut E) -> TagState {
        match byte {
            b'>' => {
                self.phase = Phase::Text;
                if !self.closing {
                    events.attributes_done();
                }
                TagState::TagEnd
            }
            b'/' => {
                self.phase = Phase::Slash;
                TagState::Tag
            }
            b'"' | b'\'' => {
                self.phase = Phase::Junk { quote: byte };
                TagState::Tag
            }
            b if is_name_start_char(b) => {
                self.phase = Phase::AttributeName { start: pos };
                TagState::Tag
            }
            _ => TagState::Tag,
        }
    }

    #[inline]
    fn finish_declaration(&mut self, byte: u8) -> TagState {
        if byte == b'>' && self.phase == Phase::Declaration {
            self.phase = Phase::Text;
            TagState::TagEnd
        } else {
            TagState::Tag
        }
    }

    #[inline]
    fn reject(&mut self) -> TagState {
        self.reset();
        TagState::Rejected
    }
}
