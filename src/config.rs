// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query-time tuning knobs.
//!
//! Every field has a serde default, so a config file only needs the keys it
//! changes. Validation happens once, before any search starts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, Error};

// ============================================================================
// DEFAULTS
// ============================================================================

fn default_threshold() -> f64 {
    0.3
}

fn default_max_candidates() -> usize {
    5
}

fn default_max_chain_steps() -> usize {
    100_000
}

fn default_min_ngram() -> usize {
    3
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Fraction of the query length allowed as edit cost. Sets the initial
    /// ceiling to `ceil(threshold * query_len)`. Must be in `(0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// How many tied candidates survive ranking.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Work-list pops allowed per segment in chain cost minimization.
    #[serde(default = "default_max_chain_steps")]
    pub max_chain_steps: usize,

    /// Shortest query n-gram looked up in the suffix array.
    #[serde(default = "default_min_ngram")]
    pub min_ngram: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_candidates: default_max_candidates(),
            max_chain_steps: default_max_chain_steps(),
            min_ngram: default_min_ngram(),
        }
    }
}

impl MatchConfig {
    pub fn new(threshold: f64, max_candidates: usize) -> Self {
        Self {
            threshold,
            max_candidates,
            ..Self::default()
        }
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MatchConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(path = %path.display(), ?config, "loaded match config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written this way round so NaN is rejected too
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::ZeroMaxCandidates);
        }
        if self.max_chain_steps == 0 {
            return Err(ConfigError::ZeroChainSteps);
        }
        if self.min_ngram == 0 {
            return Err(ConfigError::ZeroMinNgram);
        }
        Ok(())
    }

    /// Initial ceiling cost for a query of `query_len` tokens.
    pub fn initial_ceiling(&self, query_len: usize) -> usize {
        (self.threshold * query_len as f64).ceil() as usize
    }
}
