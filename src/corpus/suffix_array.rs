// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suffix array over token ids, and n-gram range lookup.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **SENTENCE_BOUNDED**: the suffix at offset `p` is
//!    `tokens[p..end_of_sentence(p)]`, never running into the next sentence.
//!    A suffix cut short by its sentence end sorts before every longer
//!    sequence it is a prefix of, so an n-gram lookup can never return an
//!    occurrence that straddles two sentences.
//! 2. **SORTED**: `suffix(sa[i]) <= suffix(sa[i + 1])`, ties broken by offset.
//! 3. **COMPLETE**: `sa` is a permutation of `0..tokens.len()`.
//!
//! Because of (2), all suffixes starting with a given n-gram are contiguous,
//! and that range only shrinks as the n-gram is extended. `NgramCursor` keeps
//! the range between lookups so each extension searches inside the last hit.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{Corpus, TokenPosition};

/// Sentence-bounded suffix starting at `offset`. Empty for offsets the
/// position table does not cover.
#[inline]
pub(crate) fn bounded_suffix<'a>(
    tokens: &'a [u32],
    positions: &[TokenPosition],
    offset: usize,
) -> &'a [u32] {
    positions
        .get(offset)
        .and_then(|pos| (offset + pos.segment_len as usize).checked_sub(pos.offset as usize))
        .and_then(|end| tokens.get(offset..end))
        .unwrap_or(&[])
}

/// Sort every token offset by its sentence-bounded suffix.
pub fn build_suffix_array(tokens: &[u32], positions: &[TokenPosition]) -> Vec<u32> {
    let mut sa: Vec<u32> = (0..tokens.len() as u32).collect();

    // INVARIANT: SORTED
    // Offset tiebreak makes the array deterministic for identical sentences.
    let order = |a: &u32, b: &u32| {
        let left = bounded_suffix(tokens, positions, *a as usize);
        let right = bounded_suffix(tokens, positions, *b as usize);
        left.cmp(right).then(a.cmp(b))
    };

    #[cfg(feature = "parallel")]
    sa.par_sort_unstable_by(order);
    #[cfg(not(feature = "parallel"))]
    sa.sort_unstable_by(order);

    sa
}

/// Position of the first suffix array entry that sorts before its
/// predecessor, if any.
pub fn first_unsorted_suffix(corpus: &Corpus) -> Option<usize> {
    let tokens = corpus.tokens();
    let positions = corpus.positions();
    corpus
        .suffix_array()
        .windows(2)
        .position(|pair| {
            let prev = bounded_suffix(tokens, positions, pair[0] as usize);
            let curr = bounded_suffix(tokens, positions, pair[1] as usize);
            prev > curr
        })
        .map(|i| i + 1)
}

/// Incrementally narrowed suffix array range for one query start position.
///
/// Start a fresh cursor per query start, then call `narrow` with
/// `query[start..start + n]` for increasing `n`. Each call searches only the
/// range left by the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramCursor {
    lo: usize,
    hi: usize,
}

impl NgramCursor {
    pub fn new(corpus: &Corpus) -> Self {
        Self {
            lo: 0,
            hi: corpus.suffix_array().len(),
        }
    }

    /// Narrow to the suffixes that start with `ngram`. Returns false (and
    /// leaves the cursor untouched) when there are none.
    ///
    /// `ngram` must extend the n-gram of the previous successful call.
    pub fn narrow(&mut self, corpus: &Corpus, ngram: &[u32]) -> bool {
        let tokens = corpus.tokens();
        let positions = corpus.positions();
        let n = ngram.len();
        let prefix = |p: u32| {
            let suffix = bounded_suffix(tokens, positions, p as usize);
            &suffix[..n.min(suffix.len())]
        };

        let window = &corpus.suffix_array()[self.lo..self.hi];
        // Leftmost suffix >= ngram, then leftmost suffix > ngram
        let first = window.partition_point(|&p| prefix(p) < ngram);
        let last = window.partition_point(|&p| prefix(p) <= ngram);
        if first == last {
            return false;
        }

        self.hi = self.lo + last;
        self.lo += first;
        true
    }

    /// Current suffix array range.
    pub fn range(&self) -> Range<usize> {
        self.lo..self.hi
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::corpus_from;

    fn ids(corpus: &Corpus, words: &str) -> Vec<u32> {
        words
            .split_whitespace()
            .map(|w| corpus.vocabulary().id(w).unwrap())
            .collect()
    }

    #[test]
    fn test_suffix_array_sorted_and_complete() {
        let corpus = corpus_from(&["a b a b c", "b a b", "c c a"]);
        assert_eq!(corpus.suffix_array().len(), corpus.token_count());
        assert_eq!(first_unsorted_suffix(&corpus), None);

        let mut seen = corpus.suffix_array().to_vec();
        seen.sort_unstable();
        let expected: Vec<u32> = (0..corpus.token_count() as u32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_narrow_finds_all_occurrences() {
        let corpus = corpus_from(&["a b a b c", "b a b", "c c a"]);
        let mut cursor = NgramCursor::new(&corpus);
        assert!(cursor.narrow(&corpus, &ids(&corpus, "a b")));
        // "a b" at 0 and 2 in sentence 0, at 1 in sentence 1
        assert_eq!(cursor.len(), 3);
        assert!(cursor.narrow(&corpus, &ids(&corpus, "a b a")));
        assert_eq!(cursor.len(), 1);
        assert!(!cursor.narrow(&corpus, &ids(&corpus, "a b a c")));
        // A miss leaves the previous range in place
        assert_eq!(cursor.len(), 1);
    }

    #[test]
    fn test_ngram_never_crosses_sentences() {
        // "x y" only exists across the boundary between the two sentences
        let corpus = corpus_from(&["w x", "y z"]);
        let mut cursor = NgramCursor::new(&corpus);
        assert!(!cursor.narrow(&corpus, &ids(&corpus, "x y")));
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = corpus_from(&[""]);
        let mut cursor = NgramCursor::new(&corpus);
        assert!(cursor.is_empty());
        assert!(!cursor.narrow(&corpus, &[0]));
    }
}
