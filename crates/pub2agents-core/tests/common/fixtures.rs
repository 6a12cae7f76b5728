//! Test fixture loading utilities

use pub2agents_core::{EuropePmcSource, SearchResponse};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load and parse a Europe PMC response fixture
pub fn load_response_fixture(name: &str) -> SearchResponse {
    EuropePmcSource::parse_search_response(&load_fixture(&format!("responses/{}", name)))
        .unwrap_or_else(|e| panic!("Invalid response fixture {}: {}", name, e))
}

/// Copy a store fixture into `dir` so tests can rewrite it
#[allow(dead_code)]
pub fn copy_store_fixture(name: &str, dir: &std::path::Path) -> PathBuf {
    let target = dir.join(name);
    std::fs::copy(fixture_path(&format!("stores/{}", name)), &target)
        .unwrap_or_else(|_| panic!("Failed to copy store fixture: {}", name));
    target
}
