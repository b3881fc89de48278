//! Catalog Policy Store - Remote policy store interface and backends
//!
//! The catalog service keeps a single resource policy per account/region and
//! exposes three calls against it: get, put (whole-document replace) and
//! delete. [`PolicyStore`] models exactly that surface. There is no
//! compare-and-swap; the last put wins.
//!
//! ## Backends
//!
//! - [`InMemoryPolicyStore`]: deterministic, journals every call, supports
//!   fault injection. Suitable for tests and dry runs.
//! - [`FileSystemPolicyStore`]: keeps the document in a JSON file, used by the
//!   handler binary for local runs.
//!
//! Production deployments plug in a backend that talks to the catalog service
//! and implements the same trait.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

// Re-exports
pub use error::{Result, StoreError};
pub use fs::FileSystemPolicyStore;
pub use memory::{InMemoryPolicyStore, StoreOperation};
pub use traits::PolicyStore;
