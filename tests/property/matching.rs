//! Match list, chain cost and candidate fold properties.

use super::common::{build_corpus, corpus_strategy, sentence_strategy, words};
use proptest::prelude::*;
use tmatch::testing::make_match;
use tmatch::{add_match, build_candidates, find_matches, parse_validate, Match, MatchConfig, Query};

const LEN: usize = 10;

/// Raw (query start, corpus start, length) triples inside a 10-token pair.
fn raw_matches() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..LEN, 0..LEN, 1..4usize), 1..7)
}

fn insert_all(raw: &[(usize, usize, usize)]) -> Vec<Match> {
    let mut list = Vec::new();
    for &(q, c, n) in raw {
        let n = n.min(LEN - q).min(LEN - c);
        add_match(&mut list, make_match(LEN, (q, q + n), (c, c + n)), LEN);
    }
    list.sort_by_key(|m| (m.corpus.start, m.query.start));
    list
}

/// Minimum chain cost by trying every subset in corpus order.
fn brute_force_cost(list: &[Match]) -> usize {
    let mut best = usize::MAX;
    for mask in 1u32..(1 << list.len()) {
        let chain: Vec<&Match> = (0..list.len()).filter(|i| mask & (1 << i) != 0).map(|i| &list[i]).collect();
        let mut internal = 0;
        let mut valid = true;
        for pair in chain.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.query.end > b.query.start || a.corpus.end > b.corpus.start {
                valid = false;
                break;
            }
            let gap = (b.query.start - a.query.end).max(b.corpus.start - a.corpus.end);
            internal += gap.saturating_sub(1);
        }
        if valid {
            let first = chain[0];
            let last = chain[chain.len() - 1];
            best = best.min(first.leftmax + last.rightmax + internal);
        }
    }
    best
}

proptest! {
    /// Property: a match list never holds one match inside another on
    /// either axis, and every match is well formed.
    #[test]
    fn prop_match_list_has_no_contained_pairs(raw in raw_matches()) {
        let list = insert_all(&raw);
        for (i, a) in list.iter().enumerate() {
            prop_assert!(!a.query.is_empty());
            prop_assert_eq!(a.query.len(), a.corpus.len());
            prop_assert_eq!(a.corpus.end + a.remain, LEN);
            prop_assert!(a.leftmin <= a.leftmax && a.rightmin <= a.rightmax);
            for (j, b) in list.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.query.contains(b.query) && !a.corpus.contains(b.corpus),
                        "{:?} contains {:?}", a, b);
                }
            }
        }
    }

    /// Property: without pruning the chain search finds the true minimum.
    #[test]
    fn prop_chain_cost_is_minimal(raw in raw_matches()) {
        let list = insert_all(&raw);
        let search = parse_validate(&list, usize::MAX / 4, usize::MAX).unwrap();
        prop_assert!(!search.exhausted);
        prop_assert_eq!(search.cost, brute_force_cost(&list));
    }

    /// Property: with any ceiling the cost never exceeds the best single
    /// match.
    #[test]
    fn prop_chain_cost_bounded_by_single(raw in raw_matches(), ceiling in 0usize..12) {
        let list = insert_all(&raw);
        let search = parse_validate(&list, ceiling, 10_000).unwrap();
        let best_single = list.iter().map(Match::max_cost).min().unwrap_or(0);
        prop_assert!(search.cost <= best_single);
    }

    /// Property: the ceiling never rises and every survivor sits at the
    /// final ceiling.
    #[test]
    fn prop_ceiling_non_increasing(
        sources in corpus_strategy(),
        sentence in sentence_strategy(),
        threshold in 0.1f64..=1.0,
    ) {
        let corpus = build_corpus(&sources);
        let config = MatchConfig::new(threshold, 5);
        let query = Query::encode(&corpus, &words(&sentence));
        let found = find_matches(&corpus, &query, config.min_ngram).unwrap();
        let initial = config.initial_ceiling(query.len());
        let search = build_candidates(&corpus, &query, found, &config, initial).unwrap();

        prop_assert_eq!(search.ceilings[0], initial);
        prop_assert!(search.ceilings.windows(2).all(|w| w[1] <= w[0]));
        for candidate in &search.candidates {
            prop_assert_eq!(candidate.cost, Some(search.ceiling));
        }
    }
}
