//! Declaration-time interface for statement contributors
//!
//! A [`StatementDeclarer`] is owned by the construction context of a
//! deployment and passed by reference to every registration. It wires each
//! declaration to its scope's single handler endpoint and to the previous
//! contributor of the same scope.

use crate::chain::ContributorChain;
use crate::endpoint::{EndpointRegistry, HandlerEndpoint};
use crate::error::{CoordinatorError, Result};
use crate::scope::{ContributorId, DeploymentScope, ScopeId};
use catalog_policy_reconciler::{LifecycleEvent, StatementProperties, RESOURCE_TYPE};
use catalog_policy_types::{HybridMode, RequestKind, Statement, StatementId};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A contributor's custom resource, as declared
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredStatement {
    pub contributor: ContributorId,
    pub statement_id: StatementId,
    pub resource_type: String,
    pub service_token: String,
    pub properties: StatementProperties,
    /// Contributor that must finish reconciling before this one starts
    pub depends_on: Option<ContributorId>,
}

impl DeclaredStatement {
    /// The lifecycle event the framework sends for this declaration
    pub fn lifecycle_event(&self, kind: RequestKind) -> LifecycleEvent {
        let physical_resource_id = match kind {
            RequestKind::Create => None,
            RequestKind::Update | RequestKind::Delete => {
                Some(self.statement_id.physical_id().to_string())
            }
        };

        LifecycleEvent {
            request_type: kind.as_str().to_string(),
            request_id: None,
            stack_id: Some(self.contributor.scope().as_str().to_string()),
            logical_resource_id: Some(self.contributor.name().to_string()),
            physical_resource_id,
            resource_type: Some(self.resource_type.clone()),
            resource_properties: self.properties.clone(),
            old_resource_properties: None,
        }
    }
}

/// Registers statement contributors across deployment scopes
pub struct StatementDeclarer {
    chain: ContributorChain,
    endpoints: EndpointRegistry,
    declarations: DashMap<ScopeId, Vec<DeclaredStatement>>,
}

impl StatementDeclarer {
    pub fn new() -> Self {
        Self {
            chain: ContributorChain::new(),
            endpoints: EndpointRegistry::new(),
            declarations: DashMap::new(),
        }
    }

    /// Declare the contributor `name` owning statement `sid` in `scope`.
    ///
    /// The first declaration in a scope creates the scope's handler endpoint;
    /// later ones reuse it and depend on the previous declaration.
    pub fn declare(
        &self,
        scope: &DeploymentScope,
        name: &str,
        sid: StatementId,
        statement: &Statement,
    ) -> Result<DeclaredStatement> {
        let contributor = scope.contributor(name);
        let statement_json = statement
            .to_json()
            .map_err(|e| CoordinatorError::Serialization(e.to_string()))?;

        // Hold the scope's entry for the whole registration.
        let mut declared = self.declarations.entry(scope.id().clone()).or_default();

        if declared.iter().any(|d| d.contributor == contributor) {
            return Err(CoordinatorError::DuplicateContributor(contributor));
        }
        if let Some(owner) = declared.iter().find(|d| d.statement_id == sid) {
            return Err(CoordinatorError::DuplicateSid {
                sid: sid.to_string(),
                owner: owner.contributor.clone(),
            });
        }

        let endpoint = self.endpoints.statement_handler(scope.id());
        let depends_on = self.chain.register(contributor.clone());

        let declaration = DeclaredStatement {
            contributor,
            statement_id: sid.clone(),
            resource_type: RESOURCE_TYPE.to_string(),
            service_token: endpoint.service_token.clone(),
            properties: StatementProperties {
                sid: sid.to_string(),
                statement: Some(Value::String(statement_json)),
                enable_hybrid: Some(HybridMode::True),
                service_token: Some(endpoint.service_token.clone()),
            },
            depends_on,
        };

        info!(
            contributor = %declaration.contributor,
            sid = %sid,
            depends_on = ?declaration.depends_on.as_ref().map(ToString::to_string),
            "Declared policy statement"
        );

        declared.push(declaration.clone());
        Ok(declaration)
    }

    /// Declarations of `scope` in registration order
    pub fn declarations(&self, scope: &ScopeId) -> Vec<DeclaredStatement> {
        self.declarations
            .get(scope)
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// The handler endpoint of `scope`, if any contributor was declared
    pub fn endpoint(&self, scope: &ScopeId) -> Option<Arc<HandlerEndpoint>> {
        self.endpoints.get(scope, crate::endpoint::ENDPOINT_KEY)
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    pub fn chain(&self) -> &ContributorChain {
        &self.chain
    }
}

impl Default for StatementDeclarer {
    fn default() -> Self {
        Self::new()
    }
}
