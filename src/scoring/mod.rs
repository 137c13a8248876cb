// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate scoring: fuzzy match score and ranking.
//!
//! The chain cost decides which segments survive; the fuzzy match score
//! decides their order. They measure different things. Cost counts
//! unmatched gaps given the chosen matches, while the score is a plain
//! normalized token edit distance between the two whole sentences.

pub mod ranking;

pub use ranking::{compare_candidates, fuzzy_match_score, rank_candidates};
