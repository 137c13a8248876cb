// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: construction-time invariants and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **`WellFormedCorpus`** cross-checks every corpus table once, when the
//!    corpus is built or decoded. Failures are `InvariantError`s and surface
//!    to callers as index corruption.
//!
//! 2. **Runtime contracts** that panic in debug builds when a query stage
//!    hands the next one something malformed. Zero-cost in release.

mod types;
pub mod contracts;

pub use types::*;
