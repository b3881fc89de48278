//! Opaque policy statements
//!
//! A statement is caller-defined structured data (effect, principal, action,
//! resource, conditions). Only the `Sid` field is interpreted; everything else
//! is carried through untouched.

use crate::error::{Result, TypeError};
use crate::ids::StatementId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name of the statement identifier in the policy grammar
pub const SID_FIELD: &str = "Sid";

/// A single policy statement, kept as an untyped JSON object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement(Map<String, Value>);

impl Statement {
    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Build a statement from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(TypeError::StatementNotObject(other.to_string())),
        }
    }

    /// Parse a statement from its JSON text encoding.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// The `Sid` carried by this statement, if it is a string.
    pub fn sid(&self) -> Option<&str> {
        self.0.get(SID_FIELD).and_then(Value::as_str)
    }

    /// True when this statement's `Sid` equals `id`.
    pub fn has_sid(&self, id: &StatementId) -> bool {
        self.sid() == Some(id.as_str())
    }

    /// Copy of this statement with its `Sid` forced to `id`.
    pub fn with_sid(&self, id: &StatementId) -> Self {
        let mut body = self.0.clone();
        body.insert(SID_FIELD.to_string(), Value::String(id.as_str().to_string()));
        Self(body)
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Statement {
    type Error = TypeError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_sid_overrides_existing() {
        let stmt = Statement::from_value(json!({"Sid": "Old", "Effect": "Allow"})).unwrap();
        let sid = StatementId::new("New").unwrap();

        let updated = stmt.with_sid(&sid);
        assert_eq!(updated.sid(), Some("New"));
        assert_eq!(updated.get("Effect"), Some(&json!("Allow")));
        // original untouched
        assert_eq!(stmt.sid(), Some("Old"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            Statement::from_json("[1, 2]"),
            Err(TypeError::StatementNotObject(_))
        ));
        assert!(matches!(
            Statement::from_json("not json"),
            Err(TypeError::Serialization(_))
        ));
    }

    #[test]
    fn test_non_string_sid_is_not_a_sid() {
        let stmt = Statement::from_value(json!({"Sid": 7})).unwrap();
        assert_eq!(stmt.sid(), None);
    }
}
