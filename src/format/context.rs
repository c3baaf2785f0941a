//! Per-candidate data a format is rendered against

use super::action::Field;

/// Read-only view of one lemmatisation candidate
pub trait OutputContext {
    /// Number of values `field` holds
    fn value_count(&self, field: Field) -> usize;

    /// Append the value(s) of `field`
    fn write_field(&self, field: Field, out: &mut Vec<u8>);
}

/// One word with everything known about it. Multi-valued fields are written
/// joined by `separator`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub word: Vec<u8>,
    pub tag: Vec<u8>,
    pub dict_lemmas: Vec<Vec<u8>>,
    pub rule_lemmas: Vec<Vec<u8>>,
    pub lemma_classes: Vec<Vec<u8>>,
    pub separator: Vec<u8>,
}

fn collect<I>(values: I) -> Vec<Vec<u8>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    values.into_iter().map(|v| v.as_ref().to_vec()).collect()
}

impl Candidate {
    pub fn new(word: impl AsRef<[u8]>) -> Self {
        Candidate {
            word: word.as_ref().to_vec(),
            separator: b"|".to_vec(),
            ..Candidate::default()
        }
    }

    pub fn with_tag(mut self, tag: impl AsRef<[u8]>) -> Self {
        self.tag = tag.as_ref().to_vec();
        self
    }

    pub fn with_dict_lemmas<I>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.dict_lemmas = collect(lemmas);
        self
    }

    pub fn with_rule_lemmas<I>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.rule_lemmas = collect(lemmas);
        self
    }

    pub fn with_lemma_classes<I>(mut self, classes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.lemma_classes = collect(classes);
        self
    }

    pub fn with_separator(mut self, separator: impl AsRef<[u8]>) -> Self {
        self.separator = separator.as_ref().to_vec();
        self
    }

    fn values(&self, field: Field) -> &[Vec<u8>] {
        match field {
            Field::DictLemma => &self.dict_lemmas,
            Field::RuleLemma => &self.rule_lemmas,
            Field::LemmaClass => &self.lemma_classes,
            Field::Word | Field::Tag => &[],
        }
    }
}

impl OutputContext for Candidate {
    fn value_count(&self, field: Field) -> usize {
        match field {
            Field::Word => usize::from(!self.word.is_empty()),
            Field::Tag => usize::from(!self.tag.is_empty()),
            _ => self.values(field).len(),
        }
    }

    fn write_field(&self, field: Field, out: &mut Vec<u8>) {
        match field {
            Field::Word => out.extend_from_slice(&self.word),
            Field::Tag => out.extend_from_slice(&self.tag),
            _ => {
                for (i, value) in self.values(field).iter().enumerate() {
                    if i > 0 {
                        out.extend_from_slice(&self.separator);
                    }
                    out.extend_from_slice(value);
                }
            }
        }
    }
}
