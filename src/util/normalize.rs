// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenization.
//!
//! Corpus and query must go through the same function, otherwise visually
//! identical tokens can end up with different ids. Tokens are split on
//! whitespace and compared exactly; no case folding, no diacritic stripping.
//! Those are the pre-processing pipeline's job.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Split a sentence into tokens.
///
/// ```
/// use tmatch::util::tokenize;
/// assert_eq!(tokenize("  the cat\tsat "), vec!["the", "cat", "sat"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(normalize_token).collect()
}

/// NFC-normalize one token, so precomposed and decomposed forms of the same
/// character compare equal.
#[cfg(feature = "unicode-normalization")]
pub fn normalize_token(token: &str) -> String {
    token.nfc().collect()
}

/// Without unicode-normalization the token is taken as-is. Input is assumed to
/// be pre-normalized.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize_token(token: &str) -> String {
    token.to_string()
}
