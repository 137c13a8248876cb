// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Merge and containment passes over a candidate's chunks.
//!
//! Both passes scan by index and compact in place; neither allocates a new
//! chunk list per iteration.

use crate::types::Chunk;
use crate::verify::contracts::check_merge_fixed_point;

/// Merge chunks that join on the query and target axes until no pair joins.
///
/// Each sweep folds later chunks into earlier ones. A sweep that removes
/// nothing means every pair was tested against its final value, so the list
/// is at a fixed point.
pub fn merge_chunks(chunks: &mut Vec<Chunk>) {
    loop {
        let before = chunks.len();
        let mut alive = vec![true; before];

        for i in 0..before {
            if !alive[i] {
                continue;
            }
            for j in (i + 1)..before {
                if alive[j] && chunks[i].joins(&chunks[j]) {
                    chunks[i] = chunks[i].union(&chunks[j]);
                    alive[j] = false;
                }
            }
        }

        let mut flags = alive.iter();
        chunks.retain(|_| flags.next().copied().unwrap_or(false));
        if chunks.len() == before {
            break;
        }
    }
    check_merge_fixed_point(chunks);
}

/// Drop every chunk lying inside another on the query and target axes.
///
/// Of two chunks with identical query and target spans, the earlier one stays.
pub fn drop_contained(chunks: &mut Vec<Chunk>) {
    let mut write = 0;
    for read in 0..chunks.len() {
        let chunk = chunks[read];
        if chunks[..write].iter().any(|kept| kept.contains(&chunk)) {
            continue;
        }
        // Evict earlier survivors the new chunk swallows
        let mut k = 0;
        for i in 0..write {
            if !chunk.contains(&chunks[i]) {
                chunks[k] = chunks[i];
                k += 1;
            }
        }
        chunks[k] = chunk;
        write = k + 1;
    }
    chunks.truncate(write);
}
