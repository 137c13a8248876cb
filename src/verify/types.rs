// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus invariants, checked once at construction.
//!
//! A corpus that passes `WellFormedCorpus::new` can be queried without any
//! lookup going out of bounds. Query code still uses checked access and turns
//! a miss into `InvariantError`, but after validation that path is dead.
//!
//! # What's Guaranteed
//!
//! | Check                | Guarantee                                      |
//! |----------------------|------------------------------------------------|
//! | segment table        | contiguous ranges covering every token once    |
//! | position table       | one entry per token, agrees with segments      |
//! | vocabulary           | strictly ascending, every token id in range    |
//! | suffix array         | permutation of offsets, sentence-bounded order |
//! | word alignments      | every pair inside its segment's sentences      |

use thiserror::Error;

use crate::corpus::Corpus;

/// The corpus index disagrees with itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("suffix array has {sa_len} entries but corpus has {token_count} tokens")]
    SuffixArrayLength { sa_len: usize, token_count: usize },

    #[error("suffix array entry {position} points at offset {offset} >= token count {token_count}")]
    SuffixOutOfBounds {
        position: usize,
        offset: usize,
        token_count: usize,
    },

    #[error("suffix array lists offset {offset} twice")]
    SuffixNotPermutation { offset: usize },

    #[error("suffix array not sorted at position {position}")]
    UnsortedSuffixArray { position: usize },

    #[error("vocabulary not strictly ascending at entry {position}")]
    UnsortedVocabulary { position: usize },

    #[error("token at offset {offset} has id {id} >= vocabulary size {vocab_len}")]
    TokenOutOfVocabulary {
        offset: usize,
        id: u32,
        vocab_len: usize,
    },

    #[error("segment {segment} starts at {start}, expected {expected}")]
    SegmentGap {
        segment: usize,
        start: usize,
        expected: usize,
    },

    #[error("segments cover {covered} tokens but corpus has {token_count}")]
    SegmentCoverage { covered: usize, token_count: usize },

    #[error("position table disagrees with segment table at offset {offset}")]
    PositionMismatch { offset: usize },

    #[error("segment {segment}: alignment {source_idx}-{target_idx} outside {source_len}x{target_len}")]
    AlignmentOutOfBounds {
        segment: usize,
        source_idx: u32,
        target_idx: u32,
        source_len: usize,
        target_len: usize,
    },

    #[error("segment {segment}: alignment covers {alignment_len} source tokens, sentence has {source_len}")]
    AlignmentLength {
        segment: usize,
        alignment_len: usize,
        source_len: usize,
    },

    #[error("segment {segment} does not exist (corpus has {segment_count})")]
    UnknownSegment {
        segment: usize,
        segment_count: usize,
    },
}

/// A corpus whose tables have been cross-checked.
///
/// Validation walks every table once and compares neighbouring suffixes, so
/// it costs about as much as reading the corpus. Run it after decoding data
/// you did not build yourself.
#[derive(Debug, Clone, Copy)]
pub struct WellFormedCorpus<'a> {
    corpus: &'a Corpus,
}

impl<'a> WellFormedCorpus<'a> {
    pub fn new(corpus: &'a Corpus) -> Result<Self, InvariantError> {
        check_segments(corpus)?;
        check_positions(corpus)?;
        check_vocabulary(corpus)?;
        check_suffix_array(corpus)?;
        check_alignments(corpus)?;
        Ok(Self { corpus })
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }
}

fn check_segments(corpus: &Corpus) -> Result<(), InvariantError> {
    let mut expected = 0;
    for (i, entry) in corpus.segments().iter().enumerate() {
        if entry.start != expected {
            return Err(InvariantError::SegmentGap {
                segment: i,
                start: entry.start,
                expected,
            });
        }
        expected += entry.len;
    }
    if expected != corpus.token_count() {
        return Err(InvariantError::SegmentCoverage {
            covered: expected,
            token_count: corpus.token_count(),
        });
    }
    Ok(())
}

fn check_positions(corpus: &Corpus) -> Result<(), InvariantError> {
    let positions = corpus.positions();
    if positions.len() != corpus.token_count() {
        return Err(InvariantError::PositionMismatch {
            offset: positions.len().min(corpus.token_count()),
        });
    }
    for (i, entry) in corpus.segments().iter().enumerate() {
        for k in 0..entry.len {
            let offset = entry.start + k;
            let pos = positions[offset];
            if pos.segment.as_usize() != i
                || pos.offset as usize != k
                || pos.segment_len as usize != entry.len
            {
                return Err(InvariantError::PositionMismatch { offset });
            }
        }
    }
    Ok(())
}

fn check_vocabulary(corpus: &Corpus) -> Result<(), InvariantError> {
    let vocabulary = corpus.vocabulary();
    if let Some(position) = vocabulary.first_unsorted() {
        return Err(InvariantError::UnsortedVocabulary { position });
    }
    let vocab_len = vocabulary.len();
    for (offset, &id) in corpus.tokens().iter().enumerate() {
        if id as usize >= vocab_len {
            return Err(InvariantError::TokenOutOfVocabulary {
                offset,
                id,
                vocab_len,
            });
        }
    }
    Ok(())
}

fn check_suffix_array(corpus: &Corpus) -> Result<(), InvariantError> {
    let sa = corpus.suffix_array();
    let token_count = corpus.token_count();
    if sa.len() != token_count {
        return Err(InvariantError::SuffixArrayLength {
            sa_len: sa.len(),
            token_count,
        });
    }

    let mut seen = vec![false; token_count];
    for (position, &offset) in sa.iter().enumerate() {
        let offset = offset as usize;
        if offset >= token_count {
            return Err(InvariantError::SuffixOutOfBounds {
                position,
                offset,
                token_count,
            });
        }
        if std::mem::replace(&mut seen[offset], true) {
            return Err(InvariantError::SuffixNotPermutation { offset });
        }
    }

    if let Some(position) = crate::corpus::first_unsorted_suffix(corpus) {
        return Err(InvariantError::UnsortedSuffixArray { position });
    }
    Ok(())
}

fn check_alignments(corpus: &Corpus) -> Result<(), InvariantError> {
    for (i, entry) in corpus.segments().iter().enumerate() {
        if entry.alignment.source_len() != entry.len {
            return Err(InvariantError::AlignmentLength {
                segment: i,
                alignment_len: entry.alignment.source_len(),
                source_len: entry.len,
            });
        }
        for (source, target) in entry.alignment.pairs() {
            if source as usize >= entry.len || target as usize >= entry.target_len {
                return Err(InvariantError::AlignmentOutOfBounds {
                    segment: i,
                    source_idx: source,
                    target_idx: target,
                    source_len: entry.len,
                    target_len: entry.target_len,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_corpus;

    fn rebuild(corpus: &Corpus, sa: Vec<u32>) -> Result<Corpus, InvariantError> {
        Corpus::from_parts(
            corpus.vocabulary().clone(),
            corpus.tokens().to_vec(),
            corpus.segments().to_vec(),
            sa,
        )
    }

    #[test]
    fn test_built_corpus_is_well_formed() {
        let corpus = sample_corpus();
        assert!(WellFormedCorpus::new(&corpus).is_ok());
    }

    #[test]
    fn test_duplicate_suffix_rejected() {
        let corpus = sample_corpus();
        let mut sa = corpus.suffix_array().to_vec();
        sa[1] = sa[0];
        let err = rebuild(&corpus, sa).unwrap_err();
        assert!(matches!(err, InvariantError::SuffixNotPermutation { .. }));
    }

    #[test]
    fn test_out_of_bounds_suffix_rejected() {
        let corpus = sample_corpus();
        let mut sa = corpus.suffix_array().to_vec();
        sa[0] = 10_000;
        let err = rebuild(&corpus, sa).unwrap_err();
        assert!(matches!(err, InvariantError::SuffixOutOfBounds { position: 0, .. }));
    }

    #[test]
    fn test_unsorted_suffix_array_rejected() {
        let corpus = sample_corpus();
        let mut sa = corpus.suffix_array().to_vec();
        sa.reverse();
        let err = rebuild(&corpus, sa).unwrap_err();
        assert!(matches!(err, InvariantError::UnsortedSuffixArray { .. }));
    }
}
