//! Reconciliation error types

use catalog_policy_store::StoreError;
use catalog_policy_types::TypeError;
use thiserror::Error;

/// Errors that fail a lifecycle operation.
///
/// The remote not-found condition never appears here: it is recovered
/// inside the reconciler. Everything else is surfaced unchanged so the
/// invoking framework can mark the operation failed and apply its own retry
/// policy.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Unknown request type: {0}")]
    UnknownRequestKind(String),

    #[error("Missing statement body for {sid}")]
    MissingStatement { sid: String },

    #[error("Invalid statement body for {sid}: {reason}")]
    InvalidStatement { sid: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] TypeError),

    #[error("Remote policy document is malformed: {0}")]
    InvalidPolicyDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Remote call failed: {0}")]
    Store(#[from] StoreError),
}

/// Result type for reconciliation
pub type Result<T> = std::result::Result<T, ReconcileError>;
