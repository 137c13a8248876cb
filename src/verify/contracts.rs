// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debug-mode contracts between query stages.
//!
//! These are zero-cost in release builds (`debug_assert!`). Each one states a
//! property the next stage relies on.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract                        | Checked after                    |
//! |---------------------------------|----------------------------------|
//! | `check_match_well_formed`       | `add_match`                      |
//! | `check_ceiling_non_increasing`  | candidate fold                   |
//! | `check_retained_disjoint`       | corpus-order walk in extraction  |
//! | `check_merge_fixed_point`       | merge pass                       |
//! | `check_no_contained_chunks`     | containment pass                 |

use crate::types::{Chunk, Match};

/// Both spans non-empty, same length, corpus span inside the segment.
#[inline]
pub fn check_match_well_formed(m: &Match) {
    debug_assert!(
        m.query.start < m.query.end && m.corpus.start < m.corpus.end,
        "Contract violation: empty match {:?}",
        m
    );
    debug_assert_eq!(
        m.query.len(),
        m.corpus.len(),
        "Contract violation: match spans differ in length"
    );
    debug_assert_eq!(
        m.corpus.end + m.remain,
        m.segment_len,
        "Contract violation: remain does not reach segment end"
    );
}

/// The ceiling only ever goes down within one query.
#[inline]
pub fn check_ceiling_non_increasing(ceilings: &[usize]) {
    debug_assert!(
        ceilings.windows(2).all(|w| w[1] <= w[0]),
        "Contract violation: ceiling rose during query: {:?}",
        ceilings
    );
}

/// Matches kept for chunk extraction are strictly ordered and disjoint on
/// both axes.
#[inline]
pub fn check_retained_disjoint(matches: &[Match]) {
    debug_assert!(
        matches.windows(2).all(|w| {
            w[0].query.end <= w[1].query.start && w[0].corpus.end <= w[1].corpus.start
        }),
        "Contract violation: retained matches overlap"
    );
}

/// No pair of chunks left that the merge pass would still join.
#[inline]
pub fn check_merge_fixed_point(chunks: &[Chunk]) {
    if cfg!(debug_assertions) {
        for i in 0..chunks.len() {
            for j in (i + 1)..chunks.len() {
                debug_assert!(
                    !chunks[i].joins(&chunks[j]),
                    "Contract violation: chunks {} and {} still mergeable",
                    i,
                    j
                );
            }
        }
    }
}

/// No chunk lies inside another on both the query and target axes.
#[inline]
pub fn check_no_contained_chunks(chunks: &[Chunk]) {
    if cfg!(debug_assertions) {
        for i in 0..chunks.len() {
            for j in 0..chunks.len() {
                debug_assert!(
                    i == j || !chunks[i].contains(&chunks[j]),
                    "Contract violation: chunk {} contains chunk {}",
                    i,
                    j
                );
            }
        }
    }
}
