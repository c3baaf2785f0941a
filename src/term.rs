//! Elixir Term Conversion Utilities
//!
//! Decodes option and candidate maps coming from Elixir, and encodes tokens
//! and results going back.

use crate::core::words::Punctuation;
use crate::document::{Span, TokenSequence};
use crate::format::Candidate;
use crate::lemmatiser::{LemmatiserOptions, Lexicon};
use crate::scan::ScanOptions;
use rustler::{Encoder, Env, NewBinary, NifMap, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
}

/// Scanner and lemmatiser options. Elixir sends every key, `nil` when unset.
#[derive(Debug, Clone, Default, NifMap)]
pub struct OptionsTerm {
    pub element: Option<String>,
    pub ancestor: Option<String>,
    pub segment: Option<String>,
    pub word_attribute: Option<String>,
    pub pos_attribute: Option<String>,
    pub lemma_attribute: Option<String>,
    pub lemma_class_attribute: Option<String>,
    pub separator: Option<String>,
    pub punctuation: Option<String>,
    pub render_unknown: Option<bool>,
}

impl OptionsTerm {
    pub fn scan_options(&self) -> ScanOptions {
        let name = |value: &Option<String>| value.clone().unwrap_or_default();
        ScanOptions::new()
            .with_element(name(&self.element))
            .with_ancestor(name(&self.ancestor))
            .with_segment(name(&self.segment))
            .with_word_attribute(name(&self.word_attribute))
            .with_pos_attribute(name(&self.pos_attribute))
            .with_lemma_attribute(name(&self.lemma_attribute))
            .with_lemma_class_attribute(name(&self.lemma_class_attribute))
    }

    pub fn punctuation(&self) -> Result<Punctuation, String> {
        match self.punctuation.as_deref() {
            None => Ok(Punctuation::default()),
            Some(name) => {
                Punctuation::from_name(name).ok_or_else(|| format!("unknown punctuation mode: {}", name))
            }
        }
    }

    /// Lemmatiser options around an already compiled `format`
    pub fn lemmatiser_options(&self, format: &str) -> Result<LemmatiserOptions, String> {
        let defaults = LemmatiserOptions::default();
        Ok(LemmatiserOptions {
            scan: self.scan_options(),
            format: format.to_string(),
            separator: self.separator.clone().unwrap_or(defaults.separator),
            punctuation: self.punctuation()?,
            render_unknown: self.render_unknown.unwrap_or(defaults.render_unknown),
        })
    }
}

/// One candidate, as rendered by `render_candidate`
#[derive(Debug, Clone, NifMap)]
pub struct CandidateTerm {
    pub word: String,
    pub tag: Option<String>,
    pub dict_lemmas: Vec<String>,
    pub rule_lemmas: Vec<String>,
    pub lemma_classes: Vec<String>,
    pub separator: Option<String>,
}

impl From<CandidateTerm> for Candidate {
    fn from(term: CandidateTerm) -> Self {
        let mut candidate = Candidate::new(term.word)
            .with_tag(term.tag.unwrap_or_default())
            .with_dict_lemmas(term.dict_lemmas)
            .with_rule_lemmas(term.rule_lemmas)
            .with_lemma_classes(term.lemma_classes);
        if let Some(separator) = term.separator {
            candidate = candidate.with_separator(separator);
        }
        candidate
    }
}

/// `[{word, lemmas, classes}]` from Elixir
pub type LexiconTerm = Vec<(String, Vec<String>, Vec<String>)>;

pub fn decode_lexicon(entries: LexiconTerm) -> Lexicon {
    let mut lexicon = Lexicon::new();
    for (word, lemmas, classes) in entries {
        lexicon.insert_with_classes(word, lemmas, classes);
    }
    lexicon
}

/// Create a binary from raw bytes
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

#[inline]
fn span_term(span: Span) -> Option<(u32, u32)> {
    span.non_empty().map(|s| (s.offset, s.len))
}

/// Tokens as `{word, pos, lemma, lemma_class, extent, segment_start}`
/// tuples. Spans are `{offset, len}`, or `nil` when unset.
pub fn tokens_to_term<'a>(env: Env<'a>, tokens: &TokenSequence) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for token in tokens.tokens().iter().rev() {
        let tuple = (
            span_term(token.word),
            span_term(token.pos),
            span_term(token.lemma),
            span_term(token.lemma_class),
            (token.extent.offset, token.extent.len),
            token.segment_start,
        );
        list = list.list_prepend(tuple.encode(env));
    }
    list
}

/// `{:ok, binary}` or `{:error, reason}`
pub fn result_to_term<'a, E: std::fmt::Display>(
    env: Env<'a>,
    result: Result<Vec<u8>, E>,
) -> Term<'a> {
    match result {
        Ok(bytes) => (ok(), bytes_to_binary(env, &bytes)).encode(env),
        Err(e) => error_term(env, e),
    }
}

pub fn error_term<'a, E: std::fmt::Display>(env: Env<'a>, reason: E) -> Term<'a> {
    (error(), reason.to_string()).encode(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Field, OutputContext};

    #[test]
    fn test_options_term_defaults() {
        let term = OptionsTerm::default();
        let options = term.lemmatiser_options("$b").unwrap();
        assert_eq!(options, LemmatiserOptions::default());
    }

    #[test]
    fn test_options_term_names() {
        let term = OptionsTerm {
            ancestor: Some("s".to_string()),
            element: Some(String::new()),
            lemma_attribute: Some("lemma".to_string()),
            punctuation: Some("separate".to_string()),
            ..OptionsTerm::default()
        };
        let options = term.lemmatiser_options("$w").unwrap();
        assert_eq!(options.scan.ancestor.as_deref(), Some(&b"s"[..]));
        assert_eq!(options.scan.element, None);
        assert_eq!(options.scan.lemma_attribute.as_deref(), Some(&b"lemma"[..]));
        assert_eq!(options.punctuation, Punctuation::Separate);
    }

    #[test]
    fn test_unknown_punctuation_rejected() {
        let term = OptionsTerm {
            punctuation: Some("drop".to_string()),
            ..OptionsTerm::default()
        };
        assert!(term.lemmatiser_options("$b").is_err());
    }

    #[test]
    fn test_candidate_term_conversion() {
        let candidate: Candidate = CandidateTerm {
            word: "saw".to_string(),
            tag: None,
            dict_lemmas: vec!["see".to_string(), "saw".to_string()],
            rule_lemmas: vec![],
            lemma_classes: vec![],
            separator: Some("/".to_string()),
        }
        .into();
        let mut out = Vec::new();
        candidate.write_field(Field::DictLemma, &mut out);
        assert_eq!(out, b"see/saw");
        assert_eq!(candidate.value_count(Field::Tag), 0);
    }

    #[test]
    fn test_decode_lexicon() {
        let lexicon = decode_lexicon(vec![(
            "dogs".to_string(),
            vec!["dog".to_string()],
            vec!["N".to_string()],
        )]);
        let entry = lexicon.get(b"dogs").unwrap();
        assert_eq!(entry.lemmas, vec![b"dog".to_vec()]);
        assert_eq!(entry.classes, vec![b"N".to_vec()]);
    }

    #[test]
    fn test_span_term() {
        assert_eq!(span_term(Span::empty()), None);
        assert_eq!(span_term(Span::new(3, 4)), Some((3, 4)));
    }
}
