//! Deployment scopes and contributor identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a deployment scope (one stack / deployment unit)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope:{}", self.0)
    }
}

/// A grouping boundary within which contributor ordering and endpoint
/// sharing are enforced
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentScope {
    id: ScopeId,
}

impl DeploymentScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScopeId::new(name),
        }
    }

    pub fn id(&self) -> &ScopeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Identity of a contributor named `name` inside this scope
    pub fn contributor(&self, name: &str) -> ContributorId {
        ContributorId::new(self.id.clone(), name)
    }
}

/// A statement-owning contributor, addressed by scope and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContributorId {
    scope: ScopeId,
    name: String,
}

impl ContributorId {
    pub fn new(scope: ScopeId, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Path-style identity, e.g. `DataStack/CrossAccountRead`
impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope.as_str(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributor_display() {
        let scope = DeploymentScope::new("DataStack");
        let contributor = scope.contributor("ReadAccess");
        assert_eq!(contributor.to_string(), "DataStack/ReadAccess");
        assert_eq!(contributor.scope(), scope.id());
        assert_eq!(format!("{}", scope.id()), "scope:DataStack");
    }
}
