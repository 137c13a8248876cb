//! Edit distance and score checked against independent implementations.

use proptest::prelude::*;
use tmatch::{edit_distance, fuzzy_match_score};

fn tokens() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..5, 0..12)
}

proptest! {
    /// Property: token edit distance agrees with strsim's generic Levenshtein.
    #[test]
    fn prop_edit_distance_matches_strsim(a in tokens(), b in tokens()) {
        prop_assert_eq!(edit_distance(&a, &b), strsim::generic_levenshtein(&a, &b));
    }

    #[test]
    fn prop_edit_distance_symmetric(a in tokens(), b in tokens()) {
        prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
    }

    /// Property: scores lie in [0, 1], carry at most 4 decimals, and reach 1
    /// only for identical sequences.
    #[test]
    fn prop_score_in_unit_interval(a in tokens(), b in tokens()) {
        let score = fuzzy_match_score(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!(((score * 10_000.0).round() - score * 10_000.0).abs() < 1e-6);
        if a == b {
            prop_assert_eq!(score, 1.0);
        } else {
            prop_assert!(score < 1.0);
        }
    }
}
