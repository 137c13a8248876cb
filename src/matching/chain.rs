// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Minimal gap cost of chaining one segment's matches.
//!
//! A chain is a sequence of matches increasing on both axes. Its cost is
//! what is left unmatched: the gap before the first match (`leftmax` of the
//! first), the gap after the last (`rightmax` of the last), and the gaps
//! between consecutive links (`internal`). Each gap counts as the larger of
//! its query side and corpus side, minus one for the link itself.
//!
//! Chains grow one link at a time from a work-list. A candidate link whose
//! optimistic cost (`leftmin` of the first match, `rightmin` of the next,
//! plus the new gap) is already above the ceiling is never expanded.
//!
//! Two chains with the same first and last match have the same boundary
//! measures and extend to the same places, so only the one with the smaller
//! internal cost needs expanding. That keeps the search polynomial in
//! practice; `max_steps` bounds it regardless.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::{Match, Span};

/// Outcome of one segment's cost search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSearch {
    /// Lowest cost found.
    pub cost: usize,
    /// Work-list pops that led to an expansion.
    pub steps: usize,
    /// The step cap ended the search; `cost` may not be minimal.
    pub exhausted: bool,
}

/// A chain of matches, summarized by its endpoints.
#[derive(Debug, Clone, Copy)]
struct Chain {
    first: usize,
    last: usize,
    query: Span,
    corpus: Span,
    internal: usize,
}

impl Chain {
    fn single(index: usize, m: &Match) -> Self {
        Self {
            first: index,
            last: index,
            query: m.query,
            corpus: m.corpus,
            internal: m.internal,
        }
    }
}

/// A proposed extension of `chain` by match `next`.
#[derive(Debug, Clone, Copy)]
struct Link {
    chain: Chain,
    next: usize,
    /// Gap cost between the chain's end and `next`.
    gap: usize,
    mincost: usize,
}

impl Link {
    /// `None` unless `m` starts at or after the chain's end on both axes.
    fn between(chain: Chain, next: usize, matches: &[Match]) -> Option<Self> {
        let m = &matches[next];
        if chain.query.end > m.query.start || chain.corpus.end > m.corpus.start {
            return None;
        }
        let query_gap = m.query.start - chain.query.end;
        let corpus_gap = m.corpus.start - chain.corpus.end;
        // Abutting matches cost nothing rather than -1
        let gap = query_gap.max(corpus_gap).saturating_sub(1);
        Some(Self {
            chain,
            next,
            gap,
            mincost: matches[chain.first].leftmin + m.rightmin + gap,
        })
    }

    fn merge(&self, matches: &[Match]) -> Chain {
        let m = &matches[self.next];
        Chain {
            first: self.chain.first,
            last: self.next,
            query: self.chain.query.union(m.query),
            corpus: self.chain.corpus.union(m.corpus),
            internal: self.chain.internal + self.gap,
        }
    }
}

/// Lowest chain cost over `matches`, or `None` for an empty list.
///
/// The result never exceeds the best single-match `leftmax + rightmax`.
pub fn parse_validate(matches: &[Match], ceiling: usize, max_steps: usize) -> Option<ChainSearch> {
    let mut cost = matches.iter().map(Match::max_cost).min()?;

    let mut work: Vec<Link> = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        let chain = Chain::single(i, m);
        work.extend((0..matches.len()).filter_map(|j| Link::between(chain, j, matches)));
    }

    let mut best_internal: HashMap<(usize, usize), usize> = HashMap::new();
    let mut steps = 0;
    let mut exhausted = false;

    while let Some(link) = work.pop() {
        if link.mincost > ceiling {
            continue;
        }
        let merged = link.merge(matches);

        match best_internal.entry((merged.first, merged.last)) {
            Entry::Occupied(mut seen) => {
                if *seen.get() <= merged.internal {
                    continue;
                }
                seen.insert(merged.internal);
            }
            Entry::Vacant(slot) => {
                slot.insert(merged.internal);
            }
        }

        if steps == max_steps {
            exhausted = true;
            break;
        }
        steps += 1;

        let total = matches[merged.first].leftmax + matches[merged.last].rightmax + merged.internal;
        cost = cost.min(total);

        work.extend((0..matches.len()).filter_map(|j| Link::between(merged, j, matches)));
    }

    Some(ChainSearch {
        cost,
        steps,
        exhausted,
    })
}
