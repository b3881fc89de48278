//! Lifecycle reconciler
//!
//! Translates one lifecycle request into get → merge → put-or-delete against
//! the remote policy store. The reconciler is stateless between invocations:
//! every call re-reads the remote document, and nothing is cached.
//!
//! Another actor writing between our get and put is an accepted race; there
//! is no optimistic-concurrency check. Contributors declared in the same
//! deployment scope are serialized by the coordinator instead.

use crate::config::HandlerConfig;
use crate::error::{ReconcileError, Result};
use crate::event::{LifecycleEvent, LifecycleResponse};
use catalog_policy_merge::{contains_statement, duplicate_sids, remove_statement, upsert_statement};
use catalog_policy_store::{PolicyStore, StoreError};
use catalog_policy_types::{
    HybridMode, PhysicalResourceId, PolicyDocument, ReconciliationRequest, RequestKind,
    DEFAULT_POLICY_VERSION,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Remote effect of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The merged document was written back
    Written { statements: usize },
    /// The last statement was removed, so the remote policy was deleted
    Deleted,
}

/// Result of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub physical_id: PhysicalResourceId,
    pub outcome: ReconcileOutcome,
}

/// Applies lifecycle requests to the shared remote policy
pub struct PolicyReconciler {
    store: Arc<dyn PolicyStore>,
    default_version: String,
}

impl PolicyReconciler {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            store,
            default_version: DEFAULT_POLICY_VERSION.to_string(),
        }
    }

    /// Reconciler over the store described by `config`
    pub fn from_config(config: &HandlerConfig) -> Self {
        Self::new(config.store.build()).with_default_version(config.policy.default_version.clone())
    }

    /// Version used when the remote store holds no policy
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn PolicyStore> {
        &self.store
    }

    /// Handle a raw lifecycle event from the provisioning framework.
    ///
    /// Unknown request types and malformed properties fail before any remote
    /// call is made.
    #[instrument(skip(self, event), fields(request_type = %event.request_type))]
    pub async fn handle_event(&self, event: &LifecycleEvent) -> Result<LifecycleResponse> {
        info!(
            request_id = event.request_id.as_deref().unwrap_or("-"),
            logical_resource_id = event.logical_resource_id.as_deref().unwrap_or("-"),
            sid = %event.resource_properties.sid,
            "Received lifecycle event"
        );

        let request = event.to_request()?;
        let physical_resource_id = self.reconcile(&request).await?;

        Ok(LifecycleResponse {
            physical_resource_id,
        })
    }

    /// Reconcile one request and return the contributor's physical identity.
    pub async fn reconcile(&self, request: &ReconciliationRequest) -> Result<PhysicalResourceId> {
        Ok(self.reconcile_with_outcome(request).await?.physical_id)
    }

    /// Reconcile one request, also reporting what was done remotely.
    #[instrument(
        skip(self, request),
        fields(kind = %request.kind, sid = %request.statement_id, store = self.store.name())
    )]
    pub async fn reconcile_with_outcome(
        &self,
        request: &ReconciliationRequest,
    ) -> Result<Reconciliation> {
        // Validate input before touching the remote document.
        let body = match request.kind {
            RequestKind::Create | RequestKind::Update => {
                Some(request.statement_body.as_ref().ok_or_else(|| {
                    ReconcileError::MissingStatement {
                        sid: request.statement_id.to_string(),
                    }
                })?)
            }
            RequestKind::Delete => None,
        };

        let current = self.fetch_current().await?;
        debug!(version = %current.version, sids = ?current.sids(), "Fetched current policy");

        let duplicates = duplicate_sids(&current);
        if !duplicates.is_empty() {
            warn!(?duplicates, "Remote policy holds duplicate statement ids");
        }

        let hybrid = request.effective_hybrid_mode();
        let outcome = match body {
            Some(body) => {
                let updated = upsert_statement(&current, &request.statement_id, body);
                self.write(&updated, hybrid).await?
            }
            None => {
                if !contains_statement(&current, &request.statement_id) {
                    debug!("Statement not present in remote policy");
                }
                let reduced = remove_statement(&current, &request.statement_id);
                if reduced.is_empty() {
                    self.delete().await?
                } else {
                    self.write(&reduced, hybrid).await?
                }
            }
        };

        let physical_id = request.physical_id();
        info!(physical_id = %physical_id, outcome = ?outcome, "Reconciled policy statement");

        Ok(Reconciliation {
            physical_id,
            outcome,
        })
    }

    async fn fetch_current(&self) -> Result<PolicyDocument> {
        match self.store.get_policy().await {
            Ok(Some(json)) => PolicyDocument::from_json(&json)
                .map_err(|e| ReconcileError::InvalidPolicyDocument(e.to_string())),
            Ok(None) => Ok(PolicyDocument::with_version(self.default_version.clone())),
            Err(StoreError::NotFound) => {
                debug!("No resource policy exists, starting from an empty document");
                Ok(PolicyDocument::with_version(self.default_version.clone()))
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch resource policy");
                Err(e.into())
            }
        }
    }

    async fn write(&self, policy: &PolicyDocument, hybrid: HybridMode) -> Result<ReconcileOutcome> {
        let json = policy
            .to_json()
            .map_err(|e| ReconcileError::Serialization(e.to_string()))?;

        if let Err(e) = self.store.put_policy(&json, hybrid).await {
            warn!(error = %e, "Failed to write resource policy");
            return Err(e.into());
        }

        debug!(sids = ?policy.sids(), %hybrid, "Wrote resource policy");
        Ok(ReconcileOutcome::Written {
            statements: policy.len(),
        })
    }

    async fn delete(&self) -> Result<ReconcileOutcome> {
        match self.store.delete_policy().await {
            Ok(()) => Ok(ReconcileOutcome::Deleted),
            // Already gone: the desired end state holds.
            Err(StoreError::NotFound) => {
                info!("Resource policy already absent");
                Ok(ReconcileOutcome::Deleted)
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete resource policy");
                Err(e.into())
            }
        }
    }
}
