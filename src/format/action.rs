//! Fields and emit actions
//!
//! The operation set is fixed by the format language: write a literal,
//! write a field of the candidate, or write how many values a field has.

use super::context::OutputContext;

/// A property of the candidate being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `$w` the word as found in the text
    Word,
    /// `$t` part of speech
    Tag,
    /// `$b` lemmas from the dictionary
    DictLemma,
    /// `$B` lemmas computed by rules
    RuleLemma,
    /// `$c` lemma classes
    LemmaClass,
}

impl Field {
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter {
            b'w' => Some(Field::Word),
            b't' => Some(Field::Tag),
            b'b' => Some(Field::DictLemma),
            b'B' => Some(Field::RuleLemma),
            b'c' => Some(Field::LemmaClass),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Field::Word => 'w',
            Field::Tag => 't',
            Field::DictLemma => 'b',
            Field::RuleLemma => 'B',
            Field::LemmaClass => 'c',
        }
    }

    /// Multi-valued fields can be counted and compared
    #[inline]
    pub fn is_countable(self) -> bool {
        matches!(self, Field::DictLemma | Field::RuleLemma | Field::LemmaClass)
    }
}

/// What a format node writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Literal(Vec<u8>),
    Field(Field),
    /// Number of values of a countable field
    Count(Field),
}

impl Action {
    /// Number of values behind this action, `None` if it has no notion of
    /// a count
    #[inline]
    pub fn count<C: OutputContext + ?Sized>(&self, ctx: &C) -> Option<usize> {
        match *self {
            Action::Field(field) | Action::Count(field) if field.is_countable() => {
                Some(ctx.value_count(field))
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_countable(&self) -> bool {
        match *self {
            Action::Field(field) | Action::Count(field) => field.is_countable(),
            Action::Literal(_) => false,
        }
    }

    pub fn perform<C: OutputContext + ?Sized>(&self, ctx: &C, out: &mut Vec<u8>) {
        match self {
            Action::Literal(bytes) => out.extend_from_slice(bytes),
            Action::Field(field) => ctx.write_field(*field, out),
            Action::Count(field) => {
                out.extend_from_slice(ctx.value_count(*field).to_string().as_bytes())
            }
        }
    }
}
