// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Translation-memory retrieval over a suffix-array corpus index.
//!
//! Given a new source sentence, find the previously translated sentences that
//! approximately match it, then pull out the aligned target fragments
//! ("chunks") that can be reused verbatim in a new translation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌───────────────┐    ┌──────────────┐
//! │  corpus/     │───▶│  matching/    │───▶│  scoring/     │───▶│  align/      │
//! │ (Vocabulary, │    │ (find_matches,│    │ (fuzzy_match_ │    │ (extract_    │
//! │  suffix arr, │    │  parse_       │    │  score, rank_ │    │  chunks,     │
//! │  alignments) │    │  validate)    │    │  candidates)  │    │  merge)      │
//! └──────────────┘    └───────────────┘    └───────────────┘    └──────────────┘
//!        │                    │                    │                    │
//!        ▼                    ▼                    ▼                    ▼
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                               verify/                                    │
//! │   WellFormedCorpus (load-time checks), contracts (debug-mode checks)     │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `engine` strings the four stages together behind `Matcher`.
//!
//! # Usage
//!
//! ```
//! use tmatch::{Corpus, MatchConfig, Matcher, MatchOutcome};
//!
//! let corpus = Corpus::from_parallel_text(
//!     &["the cat sat on the mat"],
//!     &["le chat était assis sur le tapis"],
//!     &["0-0 1-1 2-2 2-3 3-4 4-5 5-6"],
//! )?;
//! let matcher = Matcher::new(&corpus, MatchConfig::default())?;
//!
//! match matcher.match_sentence("the cat sat on a mat")? {
//!     MatchOutcome::Candidates { chunks, .. } => assert!(!chunks.is_empty()),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok::<(), tmatch::Error>(())
//! ```

pub mod align;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod matching;
pub mod scoring;
pub mod testing;
pub mod types;
pub mod util;
pub mod verify;

// Re-exports for public API
pub use align::{drop_contained, extract_chunks, merge_chunks, retain_monotone};
pub use config::MatchConfig;
pub use corpus::{Corpus, NgramCursor, SegmentEntry, TokenPosition, Vocabulary, WordAlignment};
pub use engine::{match_and_align, Matcher, Retrieval};
pub use error::{ConfigError, Error, InvariantError, Result};
pub use fuzzy::edit_distance;
pub use matching::{
    add_match, build_candidates, find_matches, parse_validate, ChainSearch, Query,
    SegmentMatches, SegmentSearch, UNKNOWN_TOKEN,
};
pub use scoring::{compare_candidates, fuzzy_match_score, rank_candidates};
pub use types::{Candidate, Chunk, Match, MatchOutcome, RankedSegment, SegmentId, Span};
pub use verify::WellFormedCorpus;
