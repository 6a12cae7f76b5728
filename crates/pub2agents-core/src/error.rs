//! Error types for pub2agents-core

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::HttpError;
use crate::sources::SourceError;

/// Result type alias for pub2agents operations
pub type Result<T> = std::result::Result<T, Pub2AgentsError>;

/// Main error type for pub2agents operations
#[derive(Error, Debug)]
pub enum Pub2AgentsError {
    /// Batch could not start
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Agent store I/O
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Agent post-processing
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// CSV export
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Registry API
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Literature search
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

/// Precondition violations that abort a reconciliation pass before any
/// network call is made
#[derive(Error, Debug, PartialEq)]
pub enum ReconcileError {
    #[error("A preprint store path must be provided in rerun mode")]
    MissingStorePath,

    #[error("Rerun mode takes its agents from the preprint store only")]
    UnexpectedAgents,

    #[error("No agents to process")]
    NoAgents,
}

/// Agent store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Could not write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Invalid agent document {path}: {message}")]
    Format { path: PathBuf, message: String },
}

/// Agent post-processing errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Could not read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No '--month YYYY-MM' argument found in {path}")]
    NoRunDate { path: PathBuf },
}

/// CSV export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

/// Registry API errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Login rejected ({status}): {body}")]
    LoginRejected { status: u16, body: String },

    #[error("Login response carried no token")]
    MissingToken,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
