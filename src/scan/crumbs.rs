//! Element stack
//!
//! Names of the currently open elements, innermost last. Close tags are
//! matched by searching outward from the innermost entry: everything up to
//! and including the first entry with the same name is popped. When no entry
//! matches, the whole stack is dropped. This tolerates overlapping markup at
//! the price of sometimes popping unrelated ancestors, and is kept as is
//! rather than turned into strict LIFO matching.

use crate::document::Span;

#[derive(Debug, Clone, Default)]
pub struct ElementStack {
    names: Vec<Span>,
}

impl ElementStack {
    pub fn new() -> Self {
        ElementStack {
            names: Vec::with_capacity(16),
        }
    }

    #[inline]
    pub fn push(&mut self, name: Span) {
        self.names.push(name);
    }

    /// Pop through the innermost element called `name`. Returns the number
    /// of entries removed.
    pub fn close(&mut self, input: &[u8], name: Span) -> usize {
        let before = self.names.len();
        match self
            .names
            .iter()
            .rposition(|open| open.same_text(&name, input))
        {
            Some(index) => self.names.truncate(index),
            None => self.names.clear(),
        }
        before - self.names.len()
    }

    #[inline]
    pub fn innermost(&self) -> Option<Span> {
        self.names.last().copied()
    }

    /// Whether the innermost open element is called `name`
    #[inline]
    pub fn innermost_is(&self, input: &[u8], name: &[u8]) -> bool {
        self.innermost()
            .is_some_and(|open| open.matches(input, name))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Drop every entry, returning how many were still open
    pub fn drain(&mut self) -> usize {
        let open = self.names.len();
        self.names.clear();
        open
    }
}
