//! Catalog Policy Coordinator - Ordering of contributors sharing one policy
//!
//! The remote policy is a single document with last-writer-wins semantics and
//! no compare-and-swap. When one deployment scope declares several statement
//! contributors, their reconciliations must not race. This crate provides the
//! declaration-time conventions that prevent it:
//!
//! - **ContributorChain**: every new contributor in a scope depends on the one
//!   declared before it, forming a strict chain (first declared runs first)
//! - **EndpointRegistry**: exactly one handler endpoint per scope, created on
//!   first use and shared by every contributor in that scope
//! - **StatementDeclarer**: the registration entry point that wires both
//! - **DeploymentPlan**: runs a scope's reconciliations strictly in chain order
//!
//! Scopes are independent. Two scopes targeting the same remote policy may
//! still race; that is outside this crate's control.
//!
//! Registries are explicit values owned by the construction context, never
//! process-wide statics, so independent scopes in one process stay isolated.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod chain;
pub mod declare;
pub mod endpoint;
pub mod error;
pub mod plan;
pub mod scope;

// Re-exports
pub use chain::ContributorChain;
pub use declare::{DeclaredStatement, StatementDeclarer};
pub use endpoint::{EndpointRegistry, EndpointSpec, HandlerEndpoint, ENDPOINT_KEY, HANDLER_PERMISSIONS};
pub use error::{CoordinatorError, Result};
pub use plan::{AppliedStatement, DeploymentPlan};
pub use scope::{ContributorId, DeploymentScope, ScopeId};
