//! Transport shared by the Europe PMC source and the registry client
//!
//! Only the status and body of a response are kept; nothing in the pipeline
//! reads response headers.

pub mod native;

pub use native::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    /// Connection, TLS or protocol failure before a status arrived
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("Cannot build a request URL from {url}")]
    InvalidUrl { url: String },
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    /// HTTP 429
    #[error("Rate limited by {url}")]
    RateLimited { url: String },
    #[error("Could not read response body from {url}: {message}")]
    Body { url: String, message: String },
    #[error("HTTP client setup failed: {message}")]
    Setup { message: String },
}

/// Status and body of a completed request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
