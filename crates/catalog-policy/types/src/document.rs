//! The shared policy document

use crate::error::Result;
use crate::ids::StatementId;
use crate::statement::Statement;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version written when no remote document exists yet
pub const DEFAULT_POLICY_VERSION: &str = "2012-10-17";

/// Resource policy document as stored by the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Opaque schema version, carried through unmodified
    #[serde(rename = "Version", default = "default_version")]
    pub version: String,

    /// Ordered statements; `Sid` values are unique after any merge
    #[serde(rename = "Statement", default)]
    pub statements: Vec<Statement>,

    /// Other top-level fields (e.g. `Id`), owned by other writers
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    DEFAULT_POLICY_VERSION.to_string()
}

impl PolicyDocument {
    pub fn new(version: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            version: version.into(),
            statements,
            extra: Map::new(),
        }
    }

    /// Same version and top-level fields, different statements
    pub fn with_statements(&self, statements: Vec<Statement>) -> Self {
        Self {
            version: self.version.clone(),
            statements,
            extra: self.extra.clone(),
        }
    }

    /// Document substituted when the remote store holds no policy
    pub fn empty() -> Self {
        Self::with_version(DEFAULT_POLICY_VERSION)
    }

    pub fn with_version(version: impl Into<String>) -> Self {
        Self::new(version, Vec::new())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// First statement with the given `Sid`
    pub fn find(&self, id: &StatementId) -> Option<&Statement> {
        self.statements.iter().find(|s| s.has_sid(id))
    }

    /// `Sid` values in document order; statements without one are skipped
    pub fn sids(&self) -> Vec<&str> {
        self.statements.iter().filter_map(Statement::sid).collect()
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::empty()
    }
}
