// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Chunk extraction: from matched source spans to reusable target spans.
//!
//! ```text
//!   matches (corpus order) ──► keep a monotone, non-overlapping subset
//!                                 │
//!   corpus gaps ──► block every target word aligned into a gap
//!                                 │
//!   per matched token pair ──► first still-available aligned target
//!                                 │   (one length-1 chunk each)
//!                                 ▼
//!                     merge pass (to fixed point) ──► containment pass
//! ```
//!
//! A target word aligned to an unmatched source word cannot be reused
//! verbatim: the new translation needs something else there. Blocking it
//! keeps such words out of every chunk, even when they are also aligned to a
//! matched source word.

mod merge;

pub use merge::{drop_contained, merge_chunks};

use tracing::trace;

use crate::corpus::Corpus;
use crate::error::Error;
use crate::types::{Candidate, Chunk, Match, Span};
use crate::verify::contracts::{check_no_contained_chunks, check_retained_disjoint};

/// Walk `matches` (sorted by corpus start) and keep each one that starts at
/// or after the previous kept match on both axes.
pub fn retain_monotone(matches: &[Match]) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::with_capacity(matches.len());
    let mut query_cursor = 0;
    let mut corpus_cursor = 0;
    for m in matches {
        if m.query.start < query_cursor || m.corpus.start < corpus_cursor {
            continue;
        }
        query_cursor = m.query.end;
        corpus_cursor = m.corpus.end;
        kept.push(*m);
    }
    check_retained_disjoint(&kept);
    kept
}

/// Extract the final chunk list for one ranked candidate.
pub fn extract_chunks(corpus: &Corpus, candidate: &Candidate) -> Result<Vec<Chunk>, Error> {
    let entry = corpus.segment(candidate.segment)?;
    let alignment = &entry.alignment;
    let fms = candidate.fms.unwrap_or(0.0);

    let mut matches = candidate.matches.clone();
    matches.sort_by_key(|m| (m.corpus.start, m.query.start));
    let retained = retain_monotone(&matches);

    // Target words reachable from unmatched source words are off limits
    let mut available = vec![true; entry.target_len];
    let mut block = |gap: Span| {
        for source in gap.iter() {
            for &target in alignment.targets_of(source) {
                if let Some(slot) = available.get_mut(target as usize) {
                    *slot = false;
                }
            }
        }
    };
    let mut cursor = 0;
    for m in &retained {
        block(Span::new(cursor, m.corpus.start));
        cursor = m.corpus.end;
    }
    block(Span::new(cursor, entry.len.max(cursor)));

    let mut chunks = Vec::new();
    for m in &retained {
        for (q, c) in m.query.iter().zip(m.corpus.iter()) {
            let first_free = alignment
                .targets_of(c)
                .iter()
                .find(|&&t| available.get(t as usize).copied().unwrap_or(false));
            if let Some(&t) = first_free {
                chunks.push(Chunk {
                    segment: candidate.segment,
                    query: Span::unit(q),
                    corpus: Span::unit(c),
                    target: Span::unit(t as usize),
                    fms,
                });
            }
        }
    }

    merge_chunks(&mut chunks);
    chunks.sort_by_key(|c| (c.query.start, c.target.start));
    drop_contained(&mut chunks);
    check_no_contained_chunks(&chunks);

    trace!(
        segment = %candidate.segment,
        retained = retained.len(),
        chunks = chunks.len(),
        "extracted chunks"
    );
    Ok(chunks)
}
