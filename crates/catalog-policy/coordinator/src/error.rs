//! Coordinator error types

use crate::scope::{ContributorId, ScopeId};
use catalog_policy_reconciler::ReconcileError;
use thiserror::Error;

/// Coordinator errors
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Contributor already declared: {0}")]
    DuplicateContributor(ContributorId),

    #[error("Statement id {sid} already owned by {owner}")]
    DuplicateSid { sid: String, owner: ContributorId },

    #[error("No contributors declared in {0}")]
    EmptyScope(ScopeId),

    #[error("Contributor chain of {scope} is broken: {reason}")]
    BrokenChain { scope: ScopeId, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Contributor {contributor} failed after {completed} completed: {source}")]
    ContributorFailed {
        contributor: ContributorId,
        completed: usize,
        #[source]
        source: ReconcileError,
    },
}

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;
