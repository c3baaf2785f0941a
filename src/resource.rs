//! ResourceArc Wrappers
//!
//! Compiled output formats and lexicons handed to the BEAM as opaque
//! references, so they are built once and reused across calls.

use crate::error::FormatResult;
use crate::format::{FormatCache, FormatTree};
use crate::lemmatiser::Lexicon;
use rustler::ResourceArc;
use std::sync::{Arc, OnceLock};

/// Wrapper for a compiled format that can be stored in a ResourceArc
pub struct FormatResource {
    pub tree: Arc<FormatTree>,
}

impl FormatResource {
    pub fn new(tree: Arc<FormatTree>) -> Self {
        FormatResource { tree }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for FormatResource {}

/// Type alias for the ResourceArc
pub type FormatRef = ResourceArc<FormatResource>;

/// Wrapper for a lexicon loaded once and shared by every lemmatise call
pub struct LexiconResource {
    pub lexicon: Lexicon,
}

impl LexiconResource {
    pub fn new(lexicon: Lexicon) -> Self {
        LexiconResource { lexicon }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for LexiconResource {}

pub type LexiconRef = ResourceArc<LexiconResource>;

static FORMATS: OnceLock<FormatCache> = OnceLock::new();

/// Compile `format`, or reuse the tree compiled for the same string earlier
pub fn compile_cached(format: &str) -> FormatResult<FormatResource> {
    FORMATS
        .get_or_init(FormatCache::default)
        .get_or_compile(format)
        .map(FormatResource::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_shares_tree() {
        let first = compile_cached("[$b]>1 ambiguous").unwrap();
        let second = compile_cached("[$b]>1 ambiguous").unwrap();
        assert!(Arc::ptr_eq(&first.tree, &second.tree));
        assert_eq!(first.tree.source(), "[$b]>1 ambiguous");
    }

    #[test]
    fn test_error_passed_through() {
        assert!(compile_cached("$z").is_err());
    }
}
