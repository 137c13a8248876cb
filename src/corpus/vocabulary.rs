// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sorted source-language vocabulary.
//!
//! A token's id is its rank in the sorted vocabulary. Because the mapping is
//! monotone, comparing two id sequences element-wise orders them exactly as
//! comparing the token strings would, and the suffix array can be built and
//! searched on integers alone.

/// Strictly ascending list of distinct tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Collect, sort and deduplicate.
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(str::to_string).collect();
        tokens.sort_unstable();
        tokens.dedup();
        Self { tokens }
    }

    /// Wrap an already-sorted list without checking it. `WellFormedCorpus`
    /// rejects it later if the order is wrong.
    pub(crate) fn from_sorted_unchecked(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    #[inline]
    pub fn id(&self, token: &str) -> Option<u32> {
        self.tokens
            .binary_search_by(|t| t.as_str().cmp(token))
            .ok()
            .map(|i| i as u32)
    }

    #[inline]
    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Index of the first entry that is not strictly greater than its
    /// predecessor.
    pub fn first_unsorted(&self) -> Option<usize> {
        self.tokens
            .windows(2)
            .position(|w| w[0] >= w[1])
            .map(|i| i + 1)
    }
}
