// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The corpus index: everything that outlives a query.
//!
//! ```text
//!   source lines ──tokenize──► Vocabulary (sorted, id = rank)
//!                                  │
//!                                  ▼
//!                  tokens: [u32]  (all sentences, flattened)
//!                  segments: [start, len, target, alignment]
//!                  positions: offset → (segment, segment_len, offset in segment)
//!                  suffix_array: offsets sorted by sentence-bounded suffix
//! ```
//!
//! Built once (from parallel text or a snapshot), then shared read-only by
//! every query. Nothing in here is mutated after construction.

pub mod alignment;
pub mod encoding;
pub mod snapshot;
mod suffix_array;
mod vocabulary;

pub use alignment::WordAlignment;
pub use suffix_array::{build_suffix_array, first_unsorted_suffix, NgramCursor};
pub use vocabulary::Vocabulary;

use std::ops::Range;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Error;
use crate::types::SegmentId;
use crate::util::tokenize;
use crate::verify::{InvariantError, WellFormedCorpus};

/// Where a flat corpus offset lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenPosition {
    pub segment: SegmentId,
    /// Token length of the segment sentence.
    pub segment_len: u32,
    /// Offset within the segment sentence.
    pub offset: u32,
}

/// One source sentence and its translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentEntry {
    /// First flat offset of the sentence.
    pub start: usize,
    /// Sentence length in tokens.
    pub len: usize,
    /// Target sentence, tokens joined by single spaces.
    pub target: String,
    pub target_len: usize,
    pub alignment: WordAlignment,
}

impl SegmentEntry {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    vocabulary: Vocabulary,
    tokens: Vec<u32>,
    positions: Vec<TokenPosition>,
    segments: Vec<SegmentEntry>,
    suffix_array: Vec<u32>,
}

impl Corpus {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Build the index from three line-aligned inputs: source sentences,
    /// target sentences, and `i-j` alignment lines.
    pub fn from_parallel_text<S: AsRef<str>>(
        sources: &[S],
        targets: &[S],
        alignments: &[S],
    ) -> Result<Self, Error> {
        if sources.len() != targets.len() || sources.len() != alignments.len() {
            return Err(Error::MisalignedCorpus {
                sources: sources.len(),
                targets: targets.len(),
                alignments: alignments.len(),
            });
        }

        let sentences: Vec<Vec<String>> = sources.iter().map(|s| tokenize(s.as_ref())).collect();
        let total: usize = sentences.iter().map(Vec::len).sum();
        // u32::MAX stays free so query code can use it for unknown tokens
        if total >= u32::MAX as usize || sentences.len() >= u32::MAX as usize {
            return Err(Error::CorpusTooLarge(total));
        }

        let vocabulary = Vocabulary::from_tokens(sentences.iter().flatten().map(String::as_str));

        let mut tokens = Vec::with_capacity(total);
        let mut segments = Vec::with_capacity(sentences.len());
        for (i, ((sentence, target), alignment)) in
            sentences.iter().zip(targets).zip(alignments).enumerate()
        {
            let start = tokens.len();
            tokens.extend(sentence.iter().filter_map(|t| vocabulary.id(t)));
            let len = tokens.len() - start;

            let target_tokens = tokenize(target.as_ref());
            let alignment = WordAlignment::parse(i, alignment.as_ref(), len, target_tokens.len())?;
            segments.push(SegmentEntry {
                start,
                len,
                target: target_tokens.join(" "),
                target_len: target_tokens.len(),
                alignment,
            });
        }

        let positions = build_positions(&segments);
        let suffix_array = build_suffix_array(&tokens, &positions);

        info!(
            segments = segments.len(),
            tokens = tokens.len(),
            vocabulary = vocabulary.len(),
            "built corpus index"
        );

        Ok(Self {
            vocabulary,
            tokens,
            positions,
            segments,
            suffix_array,
        })
    }

    /// Read the three parallel files and build the index.
    pub fn from_files(source: &Path, target: &Path, alignment: &Path) -> Result<Self, Error> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
        };
        let sources = read(source)?;
        let targets = read(target)?;
        let alignments = read(alignment)?;

        let lines = |text: &str| text.lines().map(str::to_string).collect::<Vec<_>>();
        Self::from_parallel_text(&lines(&sources), &lines(&targets), &lines(&alignments))
    }

    /// Reassemble a corpus from stored tables and cross-check them.
    ///
    /// The position table is derived from the segment table, never stored.
    pub fn from_parts(
        vocabulary: Vocabulary,
        tokens: Vec<u32>,
        segments: Vec<SegmentEntry>,
        suffix_array: Vec<u32>,
    ) -> Result<Self, InvariantError> {
        let positions = build_positions(&segments);
        let corpus = Self {
            vocabulary,
            tokens,
            positions,
            segments,
            suffix_array,
        };
        WellFormedCorpus::new(&corpus)?;
        Ok(corpus)
    }

    // =========================================================================
    // TABLES
    // =========================================================================

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    pub fn positions(&self) -> &[TokenPosition] {
        &self.positions
    }

    pub fn segments(&self) -> &[SegmentEntry] {
        &self.segments
    }

    pub fn suffix_array(&self) -> &[u32] {
        &self.suffix_array
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    pub fn segment(&self, id: SegmentId) -> Result<&SegmentEntry, InvariantError> {
        self.segments
            .get(id.as_usize())
            .ok_or(InvariantError::UnknownSegment {
                segment: id.as_usize(),
                segment_count: self.segments.len(),
            })
    }

    /// Token ids of a segment sentence.
    pub fn sentence_ids(&self, id: SegmentId) -> Result<&[u32], InvariantError> {
        let entry = self.segment(id)?;
        self.tokens
            .get(entry.range())
            .ok_or(InvariantError::SegmentCoverage {
                covered: entry.start + entry.len,
                token_count: self.tokens.len(),
            })
    }

    /// Source sentence of a segment as text.
    pub fn sentence(&self, id: SegmentId) -> Result<String, InvariantError> {
        let words: Vec<&str> = self
            .sentence_ids(id)?
            .iter()
            .filter_map(|&t| self.vocabulary.token(t))
            .collect();
        Ok(words.join(" "))
    }

    /// Target sentence of a segment.
    pub fn target(&self, id: SegmentId) -> Result<&str, InvariantError> {
        Ok(self.segment(id)?.target.as_str())
    }

    /// Resolve every suffix array entry in `range` to its sentence position.
    pub fn occurrences(&self, range: Range<usize>) -> Result<Vec<TokenPosition>, InvariantError> {
        let entries = self
            .suffix_array
            .get(range.clone())
            .ok_or(InvariantError::SuffixArrayLength {
                sa_len: self.suffix_array.len(),
                token_count: self.tokens.len(),
            })?;
        entries
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                self.positions
                    .get(offset as usize)
                    .copied()
                    .ok_or(InvariantError::SuffixOutOfBounds {
                        position: range.start + i,
                        offset: offset as usize,
                        token_count: self.tokens.len(),
                    })
            })
            .collect()
    }
}

/// Offset → (segment, length, offset in segment), one entry per token.
fn build_positions(segments: &[SegmentEntry]) -> Vec<TokenPosition> {
    let mut positions = Vec::with_capacity(segments.iter().map(|s| s.len).sum());
    for (i, entry) in segments.iter().enumerate() {
        for k in 0..entry.len {
            positions.push(TokenPosition {
                segment: SegmentId(i as u32),
                segment_len: entry.len as u32,
                offset: k as u32,
            });
        }
    }
    positions
}
