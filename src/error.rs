// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Only two things abort a query: a bad configuration (caught before any
//! search starts) and a corrupted corpus index. "No match" and "exact match"
//! are ordinary outcomes, see `MatchOutcome`.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::verify::InvariantError;

/// Configuration rejected before any search begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold {0} is outside (0, 1]")]
    ThresholdOutOfRange(f64),
    #[error("max_candidates must be at least 1")]
    ZeroMaxCandidates,
    #[error("max_chain_steps must be at least 1")]
    ZeroChainSteps,
    #[error("min_ngram must be at least 1")]
    ZeroMinNgram,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The suffix array, token table or segment table disagree with each
    /// other. The snapshot is corrupted or was built for a different corpus.
    #[error("corpus index corruption: {0}")]
    Corruption(#[from] InvariantError),

    #[error("segment {segment}: malformed alignment pair '{pair}'")]
    MalformedAlignment { segment: usize, pair: String },

    #[error("parallel corpus is misaligned: {sources} source lines, {targets} target lines, {alignments} alignment lines")]
    MisalignedCorpus {
        sources: usize,
        targets: usize,
        alignments: usize,
    },

    #[error("corpus too large: {0} tokens (limit is u32::MAX - 1)")]
    CorpusTooLarge(usize),

    #[error("snapshot: {0}")]
    Snapshot(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
