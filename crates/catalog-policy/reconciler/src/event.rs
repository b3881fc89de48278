//! Lifecycle events from the provisioning framework
//!
//! The framework delivers custom-resource events in its own casing. The
//! statement arrives JSON-encoded inside a string property, and every other
//! property may be stringified (`"true"` rather than `true`).

use crate::error::{ReconcileError, Result};
use catalog_policy_types::{
    HybridMode, PhysicalResourceId, ReconciliationRequest, RequestKind, Statement, StatementId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resource type registered for statement contributors
pub const RESOURCE_TYPE: &str = "Custom::GlueResourcePolicyStatement";

/// Properties a contributor declares on its custom resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementProperties {
    #[serde(rename = "Sid")]
    pub sid: String,

    /// JSON-encoded statement; an inline object is accepted as well
    #[serde(rename = "Statement", default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<Value>,

    #[serde(rename = "EnableHybrid", default, skip_serializing_if = "Option::is_none")]
    pub enable_hybrid: Option<HybridMode>,

    #[serde(rename = "ServiceToken", default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
}

/// A create/update/delete event for one statement contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    /// Kept as text so unknown kinds reach the reconciler and fail there
    pub request_type: String,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub stack_id: Option<String>,

    #[serde(default)]
    pub logical_resource_id: Option<String>,

    #[serde(default)]
    pub physical_resource_id: Option<String>,

    #[serde(default)]
    pub resource_type: Option<String>,

    pub resource_properties: StatementProperties,

    #[serde(default)]
    pub old_resource_properties: Option<StatementProperties>,
}

impl LifecycleEvent {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReconcileError::Serialization(e.to_string()))
    }

    /// Validate the event and build the request it describes.
    ///
    /// The statement body is only required for Create and Update.
    pub fn to_request(&self) -> Result<ReconciliationRequest> {
        let kind: RequestKind = self
            .request_type
            .parse()
            .map_err(|_| ReconcileError::UnknownRequestKind(self.request_type.clone()))?;

        let props = &self.resource_properties;
        let statement_id = StatementId::new(props.sid.clone())?;

        let statement_body = if kind.is_upsert() {
            Some(parse_statement(&statement_id, props.statement.as_ref())?)
        } else {
            None
        };

        Ok(ReconciliationRequest {
            kind,
            statement_id,
            statement_body,
            hybrid_mode: props.enable_hybrid,
        })
    }
}

fn parse_statement(sid: &StatementId, raw: Option<&Value>) -> Result<Statement> {
    let invalid = |reason: String| ReconcileError::InvalidStatement {
        sid: sid.to_string(),
        reason,
    };

    match raw {
        None | Some(Value::Null) => Err(ReconcileError::MissingStatement {
            sid: sid.to_string(),
        }),
        Some(Value::String(text)) => Statement::from_json(text).map_err(|e| invalid(e.to_string())),
        Some(value) => Statement::from_value(value.clone()).map_err(|e| invalid(e.to_string())),
    }
}

/// Response returned to the framework on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleResponse {
    #[serde(rename = "PhysicalResourceId")]
    pub physical_resource_id: PhysicalResourceId,
}
