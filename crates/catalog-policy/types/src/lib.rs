//! Catalog Policy Types - Core types for the shared resource policy
//!
//! A data catalog exposes exactly one resource policy document per
//! account/region. Independent contributors each own one statement in that
//! document, keyed by its `Sid`, and reconcile it through read-merge-write
//! cycles against the remote store.
//!
//! ## Key Concepts
//!
//! - **PolicyDocument**: The shared document (`Version` + ordered `Statement` list)
//! - **Statement**: One opaque clause; only its `Sid` is interpreted
//! - **StatementId**: The merge key owned by a single contributor
//! - **ReconciliationRequest**: One lifecycle request (Create/Update/Delete)
//! - **PhysicalResourceId**: Stable identity reported back to the lifecycle caller

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod document;
pub mod error;
pub mod ids;
pub mod request;
pub mod statement;

// Re-export main types
pub use document::{PolicyDocument, DEFAULT_POLICY_VERSION};
pub use error::{Result, TypeError};
pub use ids::{PhysicalResourceId, StatementId};
pub use request::{HybridMode, ReconciliationRequest, RequestKind};
pub use statement::{Statement, SID_FIELD};
