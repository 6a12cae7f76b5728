//! Common traits for literature search sources

use super::europepmc::SearchResponse;
use crate::http::HttpError;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("Unexpected status {status}")]
    Status { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited { .. } => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// A literature database that answers free-text queries.
///
/// Every failure is reported through `SourceError`; callers that only care
/// about "found / not found" collapse the error themselves.
pub trait LiteratureSearch {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchResponse, SourceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_its_own_source_error() {
        let err: SourceError = HttpError::RateLimited {
            url: "https://www.ebi.ac.uk/europepmc/webservices/rest/search".to_string(),
        }
        .into();
        assert!(matches!(err, SourceError::RateLimit));

        let err: SourceError = HttpError::Timeout {
            url: "https://www.ebi.ac.uk/europepmc/webservices/rest/search".to_string(),
        }
        .into();
        assert!(matches!(err, SourceError::Http(HttpError::Timeout { .. })));
    }
}
