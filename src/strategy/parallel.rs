//! Parallel lemmatisation
//!
//! Uses Rayon to lemmatise several documents at once. Each document gets its
//! own buffer, element stack and tokens; the compiled format is shared.

use crate::error::Result;
use crate::lemmatiser::{LemmaSource, Session, Tally};
use rayon::prelude::*;

/// Lemmatise `inputs` in parallel within one session. Results are in input
/// order; the session tally receives the counts of every document.
pub fn lemmatise_parallel<L>(
    session: &mut Session<'_>,
    inputs: &[&[u8]],
    source: &L,
) -> Vec<Result<Vec<u8>>>
where
    L: LemmaSource + Sync + ?Sized,
{
    let lemmatiser = session.lemmatiser();
    let (results, tallies): (Vec<_>, Vec<_>) = inputs
        .par_iter()
        .map(|input| {
            let mut tally = Tally::default();
            let result = lemmatiser.lemmatise_document(input, source, &mut tally);
            (result, tally)
        })
        .unzip();

    let merged = session.tally_mut();
    for tally in tallies {
        merged.merge(tally);
    }
    tracing::debug!(documents = inputs.len(), "parallel lemmatisation complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatiser::{Lemmatiser, LemmatiserOptions, Lexicon};

    #[test]
    fn test_parallel_matches_sequential() {
        let mut lexicon = Lexicon::new();
        lexicon.insert("dogs", ["dog"]);
        lexicon.insert("ran", ["run"]);
        let lemmatiser = Lemmatiser::new(LemmatiserOptions::default()).unwrap();
        let inputs: [&[u8]; 4] = [b"<p>dogs ran</p>", b"cats", b"", b"ran ran"];

        let sequential: Vec<Vec<u8>> = {
            let mut session = lemmatiser.session().unwrap();
            inputs
                .iter()
                .map(|input| session.lemmatise(input, &lexicon).unwrap())
                .collect()
        };

        let mut session = lemmatiser.session().unwrap();
        let parallel: Vec<Vec<u8>> = lemmatise_parallel(&mut session, &inputs, &lexicon)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel[0], b"<p>dog run</p>");
        assert_eq!(session.tally().total, 5);
        assert_eq!(session.tally().distinct(), 3);
    }
}
