//! Corpus index properties: suffix order, completeness, lookup exactness.

use super::common::{assert_corpus_well_formed, build_corpus, corpus_strategy, sentence_strategy};
use proptest::prelude::*;
use tmatch::{Corpus, NgramCursor};

/// Suffix at `offset`, cut at the end of its sentence.
fn bounded(corpus: &Corpus, offset: usize) -> &[u32] {
    let pos = corpus.positions()[offset];
    let end = offset - pos.offset as usize + pos.segment_len as usize;
    &corpus.tokens()[offset..end]
}

proptest! {
    /// Property: every corpus built from text passes the structural checks.
    #[test]
    fn prop_corpus_always_well_formed(sources in corpus_strategy()) {
        let corpus = build_corpus(&sources);
        assert_corpus_well_formed(&corpus);
    }

    /// Property: suffixes are in ascending order, ties by offset.
    #[test]
    fn prop_suffix_array_sorted(sources in corpus_strategy()) {
        let corpus = build_corpus(&sources);
        for pair in corpus.suffix_array().windows(2) {
            let (a, b) = (pair[0] as usize, pair[1] as usize);
            let (left, right) = (bounded(&corpus, a), bounded(&corpus, b));
            prop_assert!(left < right || (left == right && a < b),
                "suffix {} ({:?}) sorted before {} ({:?})", a, left, b, right);
        }
    }

    /// Property: an n-gram lookup returns exactly the offsets a linear scan
    /// finds inside single sentences.
    #[test]
    fn prop_lookup_matches_linear_scan(
        sources in corpus_strategy(),
        probe in sentence_strategy(),
    ) {
        let corpus = build_corpus(&sources);
        let ngram: Option<Vec<u32>> = probe
            .split_whitespace()
            .take(3)
            .map(|t| corpus.vocabulary().id(t))
            .collect();
        prop_assume!(ngram.is_some());
        let ngram = ngram.unwrap_or_default();

        let mut expected: Vec<usize> = (0..corpus.token_count())
            .filter(|&p| bounded(&corpus, p).starts_with(&ngram))
            .collect();
        expected.sort_unstable();

        let mut cursor = NgramCursor::new(&corpus);
        let mut found = true;
        for n in 1..=ngram.len() {
            found &= cursor.narrow(&corpus, &ngram[..n]);
            if !found {
                break;
            }
        }
        let mut actual: Vec<usize> = if found {
            corpus.suffix_array()[cursor.range()].iter().map(|&p| p as usize).collect()
        } else {
            Vec::new()
        };
        actual.sort_unstable();

        prop_assert_eq!(actual, expected);
    }
}
