//! In-memory literature search answering from canned responses

use pub2agents_core::{LiteratureSearch, SearchResponse, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;

use super::fixtures::load_response_fixture;

/// Answers exact query strings; anything else is a 503
#[derive(Default)]
pub struct FakeSearch {
    responses: HashMap<String, SearchResponse>,
    queries: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with a response fixture
    pub fn respond(mut self, query: &str, fixture: &str) -> Self {
        self.responses
            .insert(query.to_string(), load_response_fixture(fixture));
        self
    }

    /// Every query received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl LiteratureSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, SourceError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .get(query)
            .cloned()
            .ok_or(SourceError::Status { status: 503 })
    }
}
