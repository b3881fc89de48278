//! Lifecycle requests against the shared policy

use crate::error::{Result, TypeError};
use crate::ids::{PhysicalResourceId, StatementId};
use crate::statement::Statement;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The caller's intended effect on its owned statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Create,
    Update,
    Delete,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Create => "Create",
            RequestKind::Update => "Update",
            RequestKind::Delete => "Delete",
        }
    }

    /// Create and Update both upsert the statement
    pub fn is_upsert(&self) -> bool {
        matches!(self, RequestKind::Create | RequestKind::Update)
    }
}

impl FromStr for RequestKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Create" => Ok(RequestKind::Create),
            "Update" => Ok(RequestKind::Update),
            "Delete" => Ok(RequestKind::Delete),
            other => Err(TypeError::UnknownRequestKind(other.to_string())),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write option forwarded to the remote store on every put.
///
/// The reconciler does not interpret it. On the wire it is `TRUE` or `FALSE`;
/// callers may also supply a boolean or any casing of those strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HybridMode {
    #[default]
    True,
    False,
}

impl HybridMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            HybridMode::True => "TRUE",
            HybridMode::False => "FALSE",
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, HybridMode::True)
    }
}

impl From<bool> for HybridMode {
    fn from(value: bool) -> Self {
        if value {
            HybridMode::True
        } else {
            HybridMode::False
        }
    }
}

impl FromStr for HybridMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRUE" => Ok(HybridMode::True),
            "FALSE" => Ok(HybridMode::False),
            _ => Err(TypeError::InvalidHybridMode(s.to_string())),
        }
    }
}

impl fmt::Display for HybridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for HybridMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for HybridMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Ok(HybridMode::from(flag)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One reconciliation request, built fresh per invocation and never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationRequest {
    pub kind: RequestKind,
    pub statement_id: StatementId,
    /// Required for Create/Update; ignored for Delete
    pub statement_body: Option<Statement>,
    /// `None` means the caller did not choose; the default applies at write time
    pub hybrid_mode: Option<HybridMode>,
}

impl ReconciliationRequest {
    pub fn create(statement_id: StatementId, body: Statement) -> Self {
        Self::upsert(RequestKind::Create, statement_id, body)
    }

    pub fn update(statement_id: StatementId, body: Statement) -> Self {
        Self::upsert(RequestKind::Update, statement_id, body)
    }

    pub fn delete(statement_id: StatementId) -> Self {
        Self {
            kind: RequestKind::Delete,
            statement_id,
            statement_body: None,
            hybrid_mode: None,
        }
    }

    fn upsert(kind: RequestKind, statement_id: StatementId, body: Statement) -> Self {
        Self {
            kind,
            statement_id,
            statement_body: Some(body),
            hybrid_mode: None,
        }
    }

    pub fn with_hybrid_mode(mut self, mode: HybridMode) -> Self {
        self.hybrid_mode = Some(mode);
        self
    }

    /// Hybrid flag to send on write
    pub fn effective_hybrid_mode(&self) -> HybridMode {
        self.hybrid_mode.unwrap_or_default()
    }

    pub fn physical_id(&self) -> PhysicalResourceId {
        self.statement_id.physical_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_kind_parse() {
        assert_eq!("Create".parse::<RequestKind>().unwrap(), RequestKind::Create);
        assert_eq!("Delete".parse::<RequestKind>().unwrap(), RequestKind::Delete);
        assert!(matches!(
            "Replace".parse::<RequestKind>(),
            Err(TypeError::UnknownRequestKind(kind)) if kind == "Replace"
        ));
        // request types are case-sensitive
        assert!("create".parse::<RequestKind>().is_err());
    }

    #[test]
    fn test_hybrid_mode_accepts_bool_and_text() {
        let from_bool: HybridMode = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(from_bool, HybridMode::False);

        let from_text: HybridMode = serde_json::from_value(json!("true")).unwrap();
        assert_eq!(from_text, HybridMode::True);

        let bad: std::result::Result<HybridMode, _> = serde_json::from_value(json!("maybe"));
        assert!(bad.is_err());

        assert_eq!(serde_json::to_value(HybridMode::False).unwrap(), json!("FALSE"));
    }

    #[test]
    fn test_hybrid_mode_defaults_to_true() {
        let sid = StatementId::new("S1").unwrap();
        let request = ReconciliationRequest::delete(sid);
        assert_eq!(request.effective_hybrid_mode(), HybridMode::True);

        let request = request.with_hybrid_mode(HybridMode::False);
        assert_eq!(request.effective_hybrid_mode(), HybridMode::False);
    }
}
