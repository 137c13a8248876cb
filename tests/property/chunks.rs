//! Chunk merge, containment and retention properties.

use proptest::prelude::*;
use tmatch::testing::{make_chunk, make_match};
use tmatch::{drop_contained, merge_chunks, retain_monotone, Chunk, Match};

fn span() -> impl Strategy<Value = (usize, usize)> {
    (0..12usize, 1..4usize).prop_map(|(start, len)| (start, start + len))
}

fn chunks() -> impl Strategy<Value = Vec<Chunk>> {
    prop::collection::vec((span(), span(), span()), 0..10)
        .prop_map(|raw| raw.into_iter().map(|(q, c, t)| make_chunk(q, c, t)).collect())
}

fn matches() -> impl Strategy<Value = Vec<Match>> {
    prop::collection::vec((0..10usize, 0..10usize, 1..4usize), 0..10).prop_map(|raw| {
        let mut list: Vec<Match> = raw
            .into_iter()
            .map(|(q, c, n)| make_match(16, (q, q + n), (c, c + n)))
            .collect();
        list.sort_by_key(|m| (m.corpus.start, m.query.start));
        list
    })
}

proptest! {
    /// Property: after merging no two chunks join, so merging again is a
    /// no-op.
    #[test]
    fn prop_merge_reaches_fixed_point(mut list in chunks()) {
        merge_chunks(&mut list);
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                prop_assert!(!a.joins(b), "{:?} still joins {:?}", a, b);
            }
        }
        let once = list.clone();
        merge_chunks(&mut list);
        prop_assert_eq!(list, once);
    }

    /// Property: merging never loses coverage on any axis.
    #[test]
    fn prop_merge_covers_inputs(list in chunks()) {
        let mut merged = list.clone();
        merge_chunks(&mut merged);
        for chunk in &list {
            prop_assert!(merged.iter().any(|m| m.query.contains(chunk.query)
                && m.corpus.contains(chunk.corpus)
                && m.target.contains(chunk.target)));
        }
    }

    /// Property: no survivor of drop_contained lies inside another, and every
    /// dropped chunk is covered by a survivor.
    #[test]
    fn prop_drop_contained_leaves_no_containment(list in chunks()) {
        let mut kept = list.clone();
        drop_contained(&mut kept);
        for (i, a) in kept.iter().enumerate() {
            for (j, b) in kept.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.contains(b));
                }
            }
        }
        for chunk in &list {
            prop_assert!(kept.iter().any(|k| k.contains(chunk)));
        }
    }

    /// Property: retained matches strictly advance on both axes.
    #[test]
    fn prop_retained_matches_are_monotone(list in matches()) {
        let kept = retain_monotone(&list);
        prop_assert!(kept.len() <= list.len());
        for pair in kept.windows(2) {
            prop_assert!(pair[0].query.end <= pair[1].query.start);
            prop_assert!(pair[0].corpus.end <= pair[1].corpus.start);
        }
        if let Some(first) = list.first() {
            prop_assert_eq!(kept.first(), Some(first));
        }
    }
}
