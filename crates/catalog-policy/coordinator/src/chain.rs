//! Per-scope contributor chain
//!
//! The remote policy has last-writer-wins semantics, so contributors in one
//! scope must not reconcile concurrently. Each newly registered contributor
//! depends on the one registered before it in the same scope, forming a
//! strict chain. Scopes are independent of each other.

use crate::scope::{ContributorId, ScopeId};
use dashmap::DashMap;
use tracing::debug;

/// Tracks the most recently registered contributor of every scope
pub struct ContributorChain {
    last: DashMap<ScopeId, ContributorId>,
}

impl ContributorChain {
    pub fn new() -> Self {
        Self {
            last: DashMap::new(),
        }
    }

    /// Register `contributor` as the newest link of its scope's chain.
    ///
    /// Returns the contributor it must wait for, or `None` when it is the
    /// first one in its scope.
    pub fn register(&self, contributor: ContributorId) -> Option<ContributorId> {
        let scope = contributor.scope().clone();
        let previous = self.last.insert(scope, contributor.clone());
        debug!(
            contributor = %contributor,
            depends_on = ?previous.as_ref().map(ToString::to_string),
            "Registered contributor"
        );
        previous
    }

    /// The most recently registered contributor of `scope`
    pub fn last(&self, scope: &ScopeId) -> Option<ContributorId> {
        self.last.get(scope).map(|c| c.clone())
    }

    /// Number of scopes with at least one contributor
    pub fn scope_count(&self) -> usize {
        self.last.len()
    }
}

impl Default for ContributorChain {
    fn default() -> Self {
        Self::new()
    }
}
