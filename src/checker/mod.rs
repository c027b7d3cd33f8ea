// src/checker/mod.rs
// =============================================================================
// This module contains the page parsing and link probing logic.
//
// Submodules:
// - html: pulls raw href values out of a fetched page
// - http: probes discovered links with HEAD requests
// =============================================================================

mod html;
mod http;

// Re-export public items so callers can write `checker::probe_all()`
pub use html::extract_hrefs;
pub use http::{build_client, probe_all, ProbeResult, StatusRecord};
