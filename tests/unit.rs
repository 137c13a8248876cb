//! Unit tests for individual components, exercised through the public API.

mod common;

#[path = "unit/loader.rs"]
mod loader;

#[path = "unit/snapshot.rs"]
mod snapshot;

#[path = "unit/suffix_array.rs"]
mod suffix_array;
