//! Strongly-typed identifiers for policy contributors
//!
//! `StatementId` is the `Sid` merge key; `PhysicalResourceId` is the identity
//! reported back to the lifecycle caller and is derived from it.

use crate::error::{Result, TypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every physical resource identity this system reports.
const PHYSICAL_ID_PREFIX: &str = "glue-policy-";

/// Statement identifier (`Sid`) unique within a policy document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatementId(String);

impl StatementId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyStatementId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The physical identity owned by this statement's contributor
    pub fn physical_id(&self) -> PhysicalResourceId {
        PhysicalResourceId::for_statement(self)
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StatementId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<StatementId> for String {
    fn from(id: StatementId) -> Self {
        id.0
    }
}

impl AsRef<str> for StatementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Physical identity of the managed statement, stable for a given `Sid`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalResourceId(String);

impl PhysicalResourceId {
    pub fn for_statement(sid: &StatementId) -> Self {
        Self(format!("{}{}", PHYSICAL_ID_PREFIX, sid.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhysicalResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
