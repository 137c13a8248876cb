// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking of tied candidates.
//!
//! Every candidate reaching this stage has the same chain cost, so order is
//! decided by the fuzzy match score `1 - d / max(len_candidate, len_query)`
//! where `d` is token edit distance. A score of exactly 1 means the sentences
//! are identical.

use std::cmp::Ordering;

use tracing::trace;

use crate::corpus::Corpus;
use crate::error::Error;
use crate::fuzzy::edit_distance;
use crate::types::Candidate;

/// Normalized similarity in `[0, 1]`, rounded to 4 decimal places.
///
/// Two empty sequences score 1.
pub fn fuzzy_match_score<T: PartialEq>(candidate: &[T], query: &[T]) -> f64 {
    let longest = candidate.len().max(query.len());
    if longest == 0 {
        return 1.0;
    }
    let distance = edit_distance(candidate, query);
    let score = 1.0 - distance as f64 / longest as f64;
    (score * 10_000.0).round() / 10_000.0
}

/// Compare two scored candidates for ranking.
///
/// Sort order:
/// 1. **Score** - higher wins
/// 2. **Segment id** - lower wins, for determinism
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    let a_score = a.fms.unwrap_or(0.0);
    let b_score = b.fms.unwrap_or(0.0);
    match b_score.partial_cmp(&a_score) {
        Some(ord) if ord != Ordering::Equal => ord,
        _ => a.segment.cmp(&b.segment),
    }
}

/// Score every candidate against the query, sort, and keep the top
/// `max_candidates`.
pub fn rank_candidates(
    corpus: &Corpus,
    query_ids: &[u32],
    mut candidates: Vec<Candidate>,
    max_candidates: usize,
) -> Result<Vec<Candidate>, Error> {
    for candidate in &mut candidates {
        let tokens = corpus.sentence_ids(candidate.segment)?;
        let fms = fuzzy_match_score(tokens, query_ids);
        trace!(segment = %candidate.segment, fms, "scored candidate");
        candidate.fms = Some(fms);
    }
    candidates.sort_by(compare_candidates);
    candidates.truncate(max_candidates);
    Ok(candidates)
}
