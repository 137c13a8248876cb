// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate sentence similarity via token edit distance.

mod levenshtein;

pub use levenshtein::*;
