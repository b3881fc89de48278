//! Store error types

use thiserror::Error;

/// Errors reported by a policy store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// No policy exists; the only error the reconciler recovers from
    #[error("Resource policy not found")]
    NotFound,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
