//! RustyLemma - markup-aware lemmatisation
//!
//! Pieces:
//! - scan: two-pass markup scanner turning a document into word tokens
//! - format: compiled output formats (`$w/$b`, `[...]>1` groups)
//! - lemmatiser: sessions that look words up and write the markup back
//! - strategy: sequential or Rayon-parallel processing of many documents

pub mod core;
pub mod document;
pub mod error;
pub mod format;
pub mod lemmatiser;
pub mod scan;
pub mod strategy;

mod resource;
mod term;

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

use crate::core::words::PlainWords;
use crate::document::Document;
use crate::format::Candidate;
use crate::lemmatiser::Lemmatiser;
use crate::scan::MarkupScanner;
use resource::{FormatRef, LexiconRef, LexiconResource};
use term::{CandidateTerm, LexiconTerm, OptionsTerm};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Output Formats
// ============================================================================

/// Compile an output format (returns {:ok, format} or {:error, reason})
#[rustler::nif]
fn compile_format<'a>(env: Env<'a>, format: &str) -> NifResult<Term<'a>> {
    match resource::compile_cached(format) {
        Ok(compiled) => Ok((term::ok(), ResourceArc::new(compiled)).encode(env)),
        Err(e) => Ok(term::error_term(env, e)),
    }
}

/// Render one candidate through a compiled format
#[rustler::nif]
fn render_candidate<'a>(env: Env<'a>, format: FormatRef, candidate: CandidateTerm) -> NifResult<Term<'a>> {
    let candidate = Candidate::from(candidate);
    let rendered = format.tree.render_to_vec(&candidate);
    Ok(term::bytes_to_binary(env, &rendered))
}

// ============================================================================
// Scanning
// ============================================================================

/// Scan a document and return its tokens as offset spans
#[rustler::nif(schedule = "DirtyCpu")]
fn scan_tokens<'a>(env: Env<'a>, input: Binary<'a>, options: OptionsTerm) -> NifResult<Term<'a>> {
    let punctuation = match options.punctuation() {
        Ok(p) => p,
        Err(e) => return Ok(term::error_term(env, e)),
    };
    let scan_options = options.scan_options();
    let scanned = Document::from_slice(input.as_slice()).and_then(|doc| {
        MarkupScanner::new(&scan_options).scan(&doc, &mut (), &mut PlainWords::new(punctuation))
    });

    match scanned {
        Ok(tokens) => Ok((term::ok(), term::tokens_to_term(env, &tokens)).encode(env)),
        Err(e) => Ok(term::error_term(env, e)),
    }
}

// ============================================================================
// Lemmatisation
// ============================================================================

/// Load a lexicon from `[{word, lemmas, classes}]`
#[rustler::nif(schedule = "DirtyCpu")]
fn new_lexicon(entries: LexiconTerm) -> LexiconRef {
    ResourceArc::new(LexiconResource::new(term::decode_lexicon(entries)))
}

#[rustler::nif]
fn lexicon_size(lexicon: LexiconRef) -> usize {
    lexicon.lexicon.len()
}

fn lemmatiser_for(format: &FormatRef, options: &OptionsTerm) -> Result<Lemmatiser, String> {
    let options = options.lemmatiser_options(format.tree.source())?;
    Ok(Lemmatiser::with_format(options, format.tree.clone()))
}

/// Lemmatise one document (returns {:ok, binary} or {:error, reason})
#[rustler::nif(schedule = "DirtyCpu")]
fn lemmatise<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    format: FormatRef,
    lexicon: LexiconRef,
    options: OptionsTerm,
) -> NifResult<Term<'a>> {
    let lemmatiser = match lemmatiser_for(&format, &options) {
        Ok(l) => l,
        Err(e) => return Ok(term::error_term(env, e)),
    };
    let result = lemmatiser
        .session()
        .and_then(|mut session| session.lemmatise(input.as_slice(), &lexicon.lexicon));
    Ok(term::result_to_term(env, result))
}

/// Lemmatise many documents in parallel within one session.
/// Returns `{results, {total, distinct, unknown, ambiguous}}`.
#[rustler::nif(schedule = "DirtyCpu")]
fn lemmatise_many<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    format: FormatRef,
    lexicon: LexiconRef,
    options: OptionsTerm,
) -> NifResult<Term<'a>> {
    let lemmatiser = match lemmatiser_for(&format, &options) {
        Ok(l) => l,
        Err(e) => return Ok(term::error_term(env, e)),
    };
    let mut session = match lemmatiser.session() {
        Ok(s) => s,
        Err(e) => return Ok(term::error_term(env, e)),
    };

    let slices: Vec<&[u8]> = inputs.iter().map(|input| input.as_slice()).collect();
    let results = strategy::lemmatise_parallel(&mut session, &slices, &lexicon.lexicon);

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        list = list.list_prepend(term::result_to_term(env, result));
    }
    let tally = session.tally();
    let counts = (tally.total, tally.distinct(), tally.unknown, tally.ambiguous);
    Ok((list, counts).encode(env))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyLemma.Native");
