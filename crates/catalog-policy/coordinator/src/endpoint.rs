//! Handler endpoints shared per scope
//!
//! All contributors in a scope route to a single execution endpoint. The
//! registry is a lookup-or-create-once map keyed by scope and a fixed
//! endpoint key.

use crate::scope::ScopeId;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fixed key of the statement handler endpoint within a scope
pub const ENDPOINT_KEY: &str = "GlueResourcePolicyStatementProvider";

/// Remote operations the handler must be allowed to call
pub const HANDLER_PERMISSIONS: [&str; 3] = [
    "glue:GetResourcePolicy",
    "glue:PutResourcePolicy",
    "glue:DeleteResourcePolicy",
];

/// Execution settings of a handler endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Time budget per invocation; exceeding it fails the invocation
    pub timeout: Duration,
    pub log_retention_days: u32,
    pub permissions: Vec<String>,
    /// Resources the permissions apply to
    pub permission_resources: Vec<String>,
}

impl Default for EndpointSpec {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5 * 60),
            log_retention_days: 7,
            permissions: HANDLER_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            permission_resources: vec!["*".to_string()],
        }
    }
}

/// One created execution endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerEndpoint {
    pub scope: ScopeId,
    pub key: String,
    /// Token contributors put on their declarations to route to this endpoint
    pub service_token: String,
    pub spec: EndpointSpec,
}

impl HandlerEndpoint {
    pub fn new(scope: ScopeId, key: impl Into<String>, spec: EndpointSpec) -> Self {
        let key = key.into();
        let service_token = format!("endpoint://{}/{}", scope.as_str(), key);
        Self {
            scope,
            key,
            service_token,
            spec,
        }
    }
}

/// Endpoints created so far, at most one per (scope, key)
pub struct EndpointRegistry {
    endpoints: DashMap<(ScopeId, String), Arc<HandlerEndpoint>>,
    created: AtomicUsize,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: DashMap::new(),
            created: AtomicUsize::new(0),
        }
    }

    /// Return the endpoint for `(scope, key)`, creating it with `create` on
    /// first use. `create` runs at most once per key.
    pub fn get_or_create<F>(&self, scope: &ScopeId, key: &str, create: F) -> Arc<HandlerEndpoint>
    where
        F: FnOnce(&ScopeId, &str) -> HandlerEndpoint,
    {
        self.endpoints
            .entry((scope.clone(), key.to_string()))
            .or_insert_with(|| {
                self.created.fetch_add(1, Ordering::SeqCst);
                info!(scope = %scope, key, "Creating handler endpoint");
                Arc::new(create(scope, key))
            })
            .clone()
    }

    /// The statement handler endpoint of `scope`, created with default settings
    pub fn statement_handler(&self, scope: &ScopeId) -> Arc<HandlerEndpoint> {
        self.get_or_create(scope, ENDPOINT_KEY, |scope, key| {
            HandlerEndpoint::new(scope.clone(), key, EndpointSpec::default())
        })
    }

    pub fn get(&self, scope: &ScopeId, key: &str) -> Option<Arc<HandlerEndpoint>> {
        self.endpoints
            .get(&(scope.clone(), key.to_string()))
            .map(|e| e.clone())
    }

    /// Number of endpoints ever created
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
