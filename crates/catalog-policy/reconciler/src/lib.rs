//! Catalog Policy Reconciler - Lifecycle handler for the shared resource policy
//!
//! Receives create/update/delete lifecycle requests for one policy statement
//! and reconciles them against the remote policy store:
//!
//! 1. Fetch the current document (a missing policy becomes an empty document)
//! 2. Upsert or remove the caller's statement by `Sid`
//! 3. Write the merged document back, or delete the remote policy when no
//!    statements remain
//! 4. Report a physical identity derived from the `Sid`
//!
//! Only a fully merged document is ever written, so a failed reconciliation
//! leaves the remote policy as it was.
//!
//! ## Usage
//!
//! ```no_run
//! use catalog_policy_reconciler::PolicyReconciler;
//! use catalog_policy_store::InMemoryPolicyStore;
//! use catalog_policy_types::{ReconciliationRequest, Statement, StatementId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reconciler = PolicyReconciler::new(Arc::new(InMemoryPolicyStore::new()));
//!
//! let sid = StatementId::new("CrossAccountRead")?;
//! let body = Statement::from_json(r#"{"Effect":"Allow","Action":"glue:GetTable","Resource":"*"}"#)?;
//! let physical_id = reconciler
//!     .reconcile(&ReconciliationRequest::create(sid, body))
//!     .await?;
//! assert_eq!(physical_id.as_str(), "glue-policy-CrossAccountRead");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod event;
pub mod reconciler;

// Re-exports
pub use config::{HandlerConfig, LoggingConfig, PolicyConfig, StoreConfig};
pub use error::{ReconcileError, Result};
pub use event::{LifecycleEvent, LifecycleResponse, StatementProperties, RESOURCE_TYPE};
pub use reconciler::{PolicyReconciler, ReconcileOutcome, Reconciliation};
