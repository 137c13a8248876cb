// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-segment evaluation against a shrinking ceiling.
//!
//! Segments are visited most-covered first, so a good candidate usually
//! lowers the ceiling early and later segments are skipped by the two cheap
//! length tests without any chain search:
//!
//! - `|segment_len - query_len| > ceiling`: the length difference alone costs
//!   more than the best so far
//! - `max(segment_len, query_len) - sumlength > ceiling`: even if every match
//!   chained perfectly, too much is left uncovered
//!
//! Survivors get local unigram and bigram matches added (the corpus-wide pass
//! only looks at n-grams of `min_ngram` and up), then a chain cost. The
//! ceiling is a plain value threaded through the fold.

use std::cmp::Ordering;

use tracing::{trace, warn};

use super::chain::parse_validate;
use super::finder::{add_match, SegmentMatches};
use super::Query;
use crate::config::MatchConfig;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::types::{Candidate, Match, SegmentId, Span};
use crate::verify::contracts::check_ceiling_non_increasing;

/// Result of the candidate fold for one query.
#[derive(Debug, Clone)]
pub struct SegmentSearch {
    /// Segments tied at the final ceiling, in visiting order.
    pub candidates: Vec<Candidate>,
    /// Final ceiling: the cost shared by every candidate, or the initial
    /// ceiling when nothing qualified.
    pub ceiling: usize,
    /// Ceiling before the first segment and after each evaluated one.
    pub ceilings: Vec<usize>,
    /// Segments pruned by the length tests.
    pub skipped: usize,
}

/// Evaluate every matched segment and keep those tied at the lowest cost.
pub fn build_candidates(
    corpus: &Corpus,
    query: &Query,
    found: SegmentMatches,
    config: &MatchConfig,
    initial_ceiling: usize,
) -> Result<SegmentSearch, Error> {
    let l = query.len();

    let mut pending: Vec<Candidate> = found
        .into_iter()
        .filter(|(_, matches)| !matches.is_empty())
        .map(|(segment, matches)| Candidate::new(segment, matches))
        .collect();
    pending.sort_by(|a, b| {
        b.sumlength
            .cmp(&a.sumlength)
            .then_with(|| a.segment.cmp(&b.segment))
    });

    let mut ceiling = initial_ceiling;
    let mut ceilings = vec![ceiling];
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut skipped = 0;

    for mut candidate in pending {
        let tokens = corpus.sentence_ids(candidate.segment)?;
        let u = tokens.len();
        if u.abs_diff(l) > ceiling || u.max(l).saturating_sub(candidate.sumlength) > ceiling {
            skipped += 1;
            continue;
        }

        augment(candidate.segment, tokens, query, &mut candidate.matches);
        candidate
            .matches
            .sort_by_key(|m| (m.corpus.start, m.query.start));

        let Some(search) = parse_validate(&candidate.matches, ceiling, config.max_chain_steps)
        else {
            continue;
        };
        if search.exhausted {
            warn!(
                segment = %candidate.segment,
                steps = search.steps,
                cost = search.cost,
                "chain search hit the step cap, using best cost so far"
            );
        }
        trace!(segment = %candidate.segment, cost = search.cost, ceiling, "evaluated segment");

        candidate.cost = Some(search.cost);
        match search.cost.cmp(&ceiling) {
            Ordering::Less => {
                ceiling = search.cost;
                candidates.clear();
                candidates.push(candidate);
            }
            Ordering::Equal => candidates.push(candidate),
            Ordering::Greater => {}
        }
        ceilings.push(ceiling);
    }

    check_ceiling_non_increasing(&ceilings);
    Ok(SegmentSearch {
        candidates,
        ceiling,
        ceilings,
        skipped,
    })
}

/// Add every bigram and unigram the segment shares with the query.
///
/// At each segment position the bigram matches go in first, then the unigram
/// ones; `add_match` discards whichever is already covered.
pub fn augment(segment: SegmentId, tokens: &[u32], query: &Query, matches: &mut Vec<Match>) {
    let l = query.len();
    let u = tokens.len();
    for i in 0..u {
        if let Some(&next) = tokens.get(i + 1) {
            for &q in query.bigram_positions(tokens[i], next) {
                let m = Match::new(segment, u, Span::new(q, q + 2), Span::new(i, i + 2));
                add_match(matches, m, l);
            }
        }
        for &q in query.unigram_positions(tokens[i]) {
            let m = Match::new(segment, u, Span::unit(q), Span::unit(i));
            add_match(matches, m, l);
        }
    }
}
