// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate sentence retrieval.
//!
//! Three stages, each narrowing the previous one:
//!
//! ```text
//!   Query ──► finder: exact n-grams (n >= min_ngram) via suffix array
//!               │      grouped per segment, redundant matches dropped
//!               ▼
//!             segments: most-covered segment first, skip what cannot beat
//!               │       the ceiling, add local 1-/2-gram matches,
//!               ▼       cost each segment with chain
//!             tied minimal-cost candidates
//! ```

pub mod chain;
pub mod finder;
pub mod segments;

pub use chain::{parse_validate, ChainSearch};
pub use finder::{add_match, find_matches, SegmentMatches};
pub use segments::{build_candidates, SegmentSearch};

use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::util::normalize_token;

/// Id used for query tokens absent from the corpus vocabulary. Never equal to
/// a corpus token id.
pub const UNKNOWN_TOKEN: u32 = u32::MAX;

/// A query sentence encoded against a corpus vocabulary, with the lookup
/// tables local augmentation needs.
#[derive(Debug, Clone)]
pub struct Query {
    ids: Vec<u32>,
    unigrams: HashMap<u32, Vec<usize>>,
    bigrams: HashMap<(u32, u32), Vec<usize>>,
}

impl Query {
    /// Each token is normalized the way the corpus loader normalizes source
    /// tokens before the vocabulary lookup.
    pub fn encode<S: AsRef<str>>(corpus: &Corpus, tokens: &[S]) -> Self {
        let ids: Vec<u32> = tokens
            .iter()
            .map(|t| {
                let token = normalize_token(t.as_ref());
                corpus.vocabulary().id(&token).unwrap_or(UNKNOWN_TOKEN)
            })
            .collect();

        let mut unigrams: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut bigrams: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (i, &id) in ids.iter().enumerate() {
            if id == UNKNOWN_TOKEN {
                continue;
            }
            unigrams.entry(id).or_default().push(i);
            if let Some(&next) = ids.get(i + 1) {
                if next != UNKNOWN_TOKEN {
                    bigrams.entry((id, next)).or_default().push(i);
                }
            }
        }

        Self {
            ids,
            unigrams,
            bigrams,
        }
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `ids[start..end]`, or `None` if it contains an unknown token (and so
    /// cannot occur in the corpus).
    pub fn ngram(&self, start: usize, end: usize) -> Option<&[u32]> {
        let ngram = self.ids.get(start..end)?;
        if ngram.contains(&UNKNOWN_TOKEN) {
            None
        } else {
            Some(ngram)
        }
    }

    /// Query positions where token `id` occurs, ascending.
    pub fn unigram_positions(&self, id: u32) -> &[usize] {
        self.unigrams.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Query start positions of the bigram `(first, second)`, ascending.
    pub fn bigram_positions(&self, first: u32, second: u32) -> &[usize] {
        self.bigrams
            .get(&(first, second))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_corpus, words};

    #[test]
    fn test_unknown_tokens_are_flagged() {
        let corpus = sample_corpus();
        let query = Query::encode(&corpus, &words("the zebra sat"));
        assert_eq!(query.ids()[1], UNKNOWN_TOKEN);
        assert!(query.ngram(0, 3).is_none());
        assert!(query.ngram(2, 3).is_some());
        assert!(query.ngram(2, 9).is_none());
    }

    #[test]
    fn test_lookup_tables() {
        let corpus = sample_corpus();
        let query = Query::encode(&corpus, &words("the cat saw the cat"));
        let the = corpus.vocabulary().id("the").unwrap();
        let cat = corpus.vocabulary().id("cat").unwrap();
        assert_eq!(query.unigram_positions(the), &[0, 3]);
        assert_eq!(query.bigram_positions(the, cat), &[0, 3]);
        // "saw" is not in the corpus, so no bigram touches it
        assert!(query.bigram_positions(cat, UNKNOWN_TOKEN).is_empty());
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_decomposed_tokens_find_composed_entries() {
        let corpus = crate::testing::corpus_from(&["le caf\u{e9} est bon"]);
        let query = Query::encode(&corpus, &["le", "cafe\u{301}", "est", "bon"]);
        let cafe = corpus.vocabulary().id("caf\u{e9}").unwrap();
        assert_eq!(query.ids()[1], cafe);
        assert!(!query.ids().contains(&UNKNOWN_TOKEN));
    }
}
