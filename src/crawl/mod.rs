// src/crawl/mod.rs
// =============================================================================
// This module handles the discovery phase.
//
// Submodules:
// - normalize: turns a raw href into a link reference (lexical join)
// - worker: fetches one seed page and emits the references found on it
// - coordinator: runs one worker per seed and merges their output into a
//   deduplicated set
//
// Only links found directly on the seed pages are collected. Pages behind
// those links are never fetched.
// =============================================================================

mod coordinator;
mod normalize;
mod worker;

pub use coordinator::{discover, DiscoverySet};
