//! Type-level validation errors

use thiserror::Error;

/// Errors raised while constructing or decoding policy types
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("Statement identifier must not be empty")]
    EmptyStatementId,

    #[error("Unknown request type: {0}")]
    UnknownRequestKind(String),

    #[error("Invalid hybrid mode value: {0}")]
    InvalidHybridMode(String),

    #[error("Statement must be a JSON object, got: {0}")]
    StatementNotObject(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for type-level operations
pub type Result<T> = std::result::Result<T, TypeError>;
