//! Store error types

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the content store and its backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Remote store did not answer within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error came from the remote backend rather than the request
    pub fn is_remote(&self) -> bool {
        matches!(self, StoreError::Remote(_) | StoreError::Timeout(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote(err.to_string())
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
