//! Scanning configuration
//!
//! Which part of the document is analysed, and which attributes carry the
//! word, part of speech, lemma and lemma class.

/// Scoping rule derived from [`ScanOptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Analyse only while the innermost open element is this one
    Element(&'a [u8]),
    /// Analyse everything inside this element, once it has been entered
    Ancestor(&'a [u8]),
    /// Analyse the whole document
    Unconstrained,
}

/// Which token field an attribute value goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    Word,
    Pos,
    Lemma,
    LemmaClass,
}

/// Scanner configuration. Empty names count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub element: Option<Vec<u8>>,
    pub ancestor: Option<Vec<u8>>,
    pub segment: Option<Vec<u8>>,
    pub word_attribute: Option<Vec<u8>>,
    pub pos_attribute: Option<Vec<u8>>,
    pub lemma_attribute: Option<Vec<u8>>,
    pub lemma_class_attribute: Option<Vec<u8>>,
}

fn non_empty(name: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
    let name = name.into();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.element = non_empty(name);
        self
    }

    pub fn with_ancestor(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.ancestor = non_empty(name);
        self
    }

    pub fn with_segment(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.segment = non_empty(name);
        self
    }

    pub fn with_word_attribute(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.word_attribute = non_empty(name);
        self
    }

    pub fn with_pos_attribute(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.pos_attribute = non_empty(name);
        self
    }

    pub fn with_lemma_attribute(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.lemma_attribute = non_empty(name);
        self
    }

    pub fn with_lemma_class_attribute(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.lemma_class_attribute = non_empty(name);
        self
    }

    /// The scoping rule. An element name wins over an ancestor name; the
    /// ancestor then only limits which elements are tracked.
    pub fn scope(&self) -> Scope<'_> {
        match (&self.element, &self.ancestor) {
            (Some(element), _) => Scope::Element(element),
            (None, Some(ancestor)) => Scope::Ancestor(ancestor),
            (None, None) => Scope::Unconstrained,
        }
    }

    /// Whether open elements need to be tracked at all
    pub fn tracks_elements(&self) -> bool {
        self.element.is_some() || self.ancestor.is_some() || self.segment.is_some()
    }

    /// Whether any attribute names are configured
    pub fn uses_attributes(&self) -> bool {
        self.word_attribute.is_some()
            || self.pos_attribute.is_some()
            || self.lemma_attribute.is_some()
            || self.lemma_class_attribute.is_some()
    }

    /// Match an attribute name against the configured names, byte for byte
    pub fn attribute_target(&self, name: &[u8]) -> Option<AttributeTarget> {
        let is = |configured: &Option<Vec<u8>>| configured.as_deref() == Some(name);
        if is(&self.word_attribute) {
            Some(AttributeTarget::Word)
        } else if is(&self.pos_attribute) {
            Some(AttributeTarget::Pos)
        } else if is(&self.lemma_attribute) {
            Some(AttributeTarget::Lemma)
        } else if is(&self.lemma_class_attribute) {
            Some(AttributeTarget::LemmaClass)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        let options = ScanOptions::new();
        assert_eq!(options.scope(), Scope::Unconstrained);
        assert!(!options.tracks_elements());
        assert!(!options.uses_attributes());
    }

    #[test]
    fn test_element_wins_over_ancestor() {
        let options = ScanOptions::new().with_ancestor("s").with_element("w");
        assert_eq!(options.scope(), Scope::Element(b"w"));
    }

    #[test]
    fn test_empty_names_are_unset() {
        let options = ScanOptions::new().with_ancestor("").with_word_attribute("");
        assert_eq!(options.ancestor, None);
        assert_eq!(options.word_attribute, None);
    }

    #[test]
    fn test_segment_alone_tracks_elements() {
        assert!(ScanOptions::new().with_segment("s").tracks_elements());
    }

    #[test]
    fn test_attribute_target_exact_match() {
        let options = ScanOptions::new()
            .with_word_attribute("form")
            .with_lemma_attribute("lemma");
        assert_eq!(options.attribute_target(b"form"), Some(AttributeTarget::Word));
        assert_eq!(options.attribute_target(b"lemma"), Some(AttributeTarget::Lemma));
        assert_eq!(options.attribute_target(b"lemm"), None);
        assert_eq!(options.attribute_target(b"forms"), None);
    }
}
