// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text helpers shared by the loader and the CLI.

pub mod normalize;

pub use normalize::{normalize_token, tokenize};
