// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a retrieval query.
//!
//! Everything here except `SegmentId` lives for exactly one query: matches are
//! found, chained, ranked and turned into chunks, then thrown away. The corpus
//! types that outlive a query live in `corpus`.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Span**: `start <= end`. Spans are half-open token ranges.
//!
//! - **Match**: `query.len() == corpus.len() > 0` and
//!   `corpus.end + remain == segment_len`. A match is an exact substring
//!   alignment, so both sides always move in lockstep.
//!
//! - **Chunk**: every span non-empty. Freshly extracted chunks have length-1
//!   spans on every axis; merging only ever grows them.

use serde::{Deserialize, Serialize};
use std::ops::Range;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Type-safe segment (corpus sentence) identifier.
///
/// Prevents accidentally passing a token offset where a segment id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SegmentId(pub u32);

impl SegmentId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for SegmentId {
    fn from(id: u32) -> Self {
        SegmentId(id)
    }
}

impl From<SegmentId> for usize {
    fn from(id: SegmentId) -> Self {
        id.0 as usize
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SPANS
// =============================================================================

/// Half-open token range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} > end {}", start, end);
        Self { start, end }
    }

    /// A single-token span at `at`.
    #[inline]
    pub fn unit(at: usize) -> Self {
        Self {
            start: at,
            end: at + 1,
        }
    }

    #[inline]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `other` lies entirely inside `self`.
    #[inline]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest span covering both.
    #[inline]
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True when the union is no longer than the two spans laid end to end,
    /// i.e. the spans overlap or abut and merging them swallows no gap.
    #[inline]
    pub fn joins(self, other: Span) -> bool {
        self.union(other).len() <= self.len() + other.len()
    }

    #[inline]
    pub fn iter(self) -> Range<usize> {
        self.start..self.end
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// An exact-substring correspondence between a query span and a span of one
/// corpus segment.
///
/// The gap measures are zero until the match is inserted into a segment's
/// match list (see `matching::add_match`), which anchors it against the query:
///
/// - `leftmin`/`rightmin`: unavoidable edit cost left/right of the match
/// - `leftmax`/`rightmax`: cost if nothing else is matched on that side
/// - `internal`: gap cost accumulated by chaining (always 0 for a single match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub segment: SegmentId,
    /// Length of the segment sentence in tokens.
    pub segment_len: usize,
    pub query: Span,
    /// Offsets within the segment sentence.
    pub corpus: Span,
    /// Segment tokens after `corpus.end`.
    pub remain: usize,
    pub leftmin: usize,
    pub rightmin: usize,
    pub leftmax: usize,
    pub rightmax: usize,
    pub internal: usize,
}

impl Match {
    pub fn new(segment: SegmentId, segment_len: usize, query: Span, corpus: Span) -> Self {
        debug_assert_eq!(query.len(), corpus.len());
        debug_assert!(corpus.end <= segment_len);
        Self {
            segment,
            segment_len,
            query,
            corpus,
            remain: segment_len - corpus.end,
            leftmin: 0,
            rightmin: 0,
            leftmax: 0,
            rightmax: 0,
            internal: 0,
        }
    }

    /// Number of tokens matched.
    #[inline]
    pub fn len(&self) -> usize {
        self.query.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Cost of using this match alone: everything outside it is an edit.
    #[inline]
    pub fn max_cost(&self) -> usize {
        self.leftmax + self.rightmax + self.internal
    }
}

// =============================================================================
// CANDIDATES
// =============================================================================

/// A segment together with the matches retained for it.
///
/// `cost` is filled in by the cost minimizer, `fms` by the ranker. Both stay
/// `None` for segments that were pruned before reaching that stage.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub segment: SegmentId,
    pub matches: Vec<Match>,
    /// Query tokens covered by the matches found corpus-wide (before local
    /// augmentation). Overlapping matches count twice.
    pub sumlength: usize,
    pub cost: Option<usize>,
    pub fms: Option<f64>,
}

impl Candidate {
    pub fn new(segment: SegmentId, matches: Vec<Match>) -> Self {
        let sumlength = matches.iter().map(Match::len).sum();
        Self {
            segment,
            matches,
            sumlength,
            cost: None,
            fms: None,
        }
    }
}

/// Summary of a ranked candidate, reported alongside its chunks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedSegment {
    pub segment: SegmentId,
    pub cost: usize,
    pub fms: f64,
}

// =============================================================================
// CHUNKS
// =============================================================================

/// A finalized aligned fragment: these query tokens correspond to these
/// target-language tokens, sourced from this corpus span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chunk {
    pub segment: SegmentId,
    pub query: Span,
    pub corpus: Span,
    pub target: Span,
    /// Fuzzy match score of the candidate the chunk came from.
    pub fms: f64,
}

impl Chunk {
    /// True when the union of the two chunks swallows no gap on the query or
    /// the target axis. The corpus span follows the query and is not tested.
    #[inline]
    pub fn joins(&self, other: &Chunk) -> bool {
        self.query.joins(other.query) && self.target.joins(other.target)
    }

    /// Chunk covering both on every axis.
    #[inline]
    pub fn union(&self, other: &Chunk) -> Chunk {
        Chunk {
            segment: self.segment,
            query: self.query.union(other.query),
            corpus: self.corpus.union(other.corpus),
            target: self.target.union(other.target),
            fms: self.fms,
        }
    }

    /// True when `other` lies inside `self` on both the query and target axes.
    #[inline]
    pub fn contains(&self, other: &Chunk) -> bool {
        self.query.contains(other.query) && self.target.contains(other.target)
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of one query. Every variant is an expected outcome, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Nothing in the corpus is close enough. The caller should pass the input
    /// through unchanged.
    NoMatch,
    /// The best candidate is identical to the query; its translation can be
    /// reused as-is without chunk alignment.
    ExactMatch { segment: SegmentId, target: String },
    /// Ranked candidates and the concatenation of their chunk lists, in rank
    /// order.
    Candidates {
        ranked: Vec<RankedSegment>,
        chunks: Vec<Chunk>,
    },
}

impl MatchOutcome {
    pub fn is_no_match(&self) -> bool {
        matches!(self, MatchOutcome::NoMatch)
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchOutcome::ExactMatch { .. })
    }

    /// Chunks for the `Candidates` variant; empty otherwise.
    pub fn chunks(&self) -> &[Chunk] {
        match self {
            MatchOutcome::Candidates { chunks, .. } => chunks,
            _ => &[],
        }
    }

    /// Ranked segments for the `Candidates` variant; empty otherwise.
    pub fn ranked(&self) -> &[RankedSegment] {
        match self {
            MatchOutcome::Candidates { ranked, .. } => ranked,
            _ => &[],
        }
    }
}
