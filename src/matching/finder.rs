// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus-wide exact n-gram matching.
//!
//! For every query start position, extend the n-gram one token at a time
//! (starting at `min_ngram` tokens) and look it up with a cursor that keeps
//! the previous range. The first miss ends that start position: a longer
//! n-gram cannot occur where a shorter prefix does not.
//!
//! # Insertion policy
//!
//! A segment's match list never holds two matches where one is contained in
//! the other on either axis. Longer extensions of the same start arrive later
//! and replace the shorter ones; a later start inside an existing match is
//! rejected outright.

use std::collections::BTreeMap;

use tracing::trace;

use super::Query;
use crate::corpus::{Corpus, NgramCursor};
use crate::error::Error;
use crate::types::{Match, SegmentId, Span};
use crate::verify::contracts::check_match_well_formed;

/// Matches per segment. Ordered by segment id so iteration is deterministic.
pub type SegmentMatches = BTreeMap<SegmentId, Vec<Match>>;

/// Find every exact n-gram of at least `min_ngram` tokens shared by the query
/// and a corpus sentence.
pub fn find_matches(corpus: &Corpus, query: &Query, min_ngram: usize) -> Result<SegmentMatches, Error> {
    let l = query.len();
    let mut found = SegmentMatches::new();
    if min_ngram == 0 || l < min_ngram {
        return Ok(found);
    }

    for start in 0..=(l - min_ngram) {
        let mut cursor = NgramCursor::new(corpus);
        for end in (start + min_ngram)..=l {
            let Some(ngram) = query.ngram(start, end) else {
                break;
            };
            if !cursor.narrow(corpus, ngram) {
                break;
            }
            let query_span = Span::new(start, end);
            for pos in corpus.occurrences(cursor.range())? {
                let offset = pos.offset as usize;
                let m = Match::new(
                    pos.segment,
                    pos.segment_len as usize,
                    query_span,
                    Span::new(offset, offset + query_span.len()),
                );
                add_match(found.entry(pos.segment).or_default(), m, l);
            }
        }
    }

    trace!(segments = found.len(), "n-gram matches");
    Ok(found)
}

/// Insert `m` into a segment's match list unless an existing match already
/// covers it. Returns whether it was inserted.
///
/// On insertion, existing matches contained in `m` on either axis are dropped
/// and `m`'s gap measures are anchored against a query of `query_len` tokens.
pub fn add_match(matches: &mut Vec<Match>, mut m: Match, query_len: usize) -> bool {
    if matches
        .iter()
        .any(|e| e.query.contains(m.query) || e.corpus.contains(m.corpus))
    {
        return false;
    }
    matches.retain(|e| !(m.query.contains(e.query) || m.corpus.contains(e.corpus)));

    anchor(&mut m, query_len);
    check_match_well_formed(&m);
    matches.push(m);
    true
}

/// Fill in `leftmin`, `rightmin`, `leftmax`, `rightmax`; reset `internal`.
fn anchor(m: &mut Match, query_len: usize) {
    let query_remain = query_len - m.query.end;

    // A nonzero offset difference is the cheapest left edit; equal offsets
    // still cost one edit if anything precedes the match in the query.
    m.leftmin = m.corpus.start.abs_diff(m.query.start);
    if m.leftmin == 0 && m.query.start > 0 {
        m.leftmin = 1;
    }
    m.rightmin = m.remain.abs_diff(query_remain);
    if m.rightmin == 0 && query_remain > 0 {
        m.rightmin = 1;
    }

    m.leftmax = m.corpus.start.max(m.query.start);
    m.rightmax = m.remain.max(query_remain);
    m.internal = 0;
}
