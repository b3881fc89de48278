//! Policy store trait

use crate::error::Result;
use async_trait::async_trait;
use catalog_policy_types::HybridMode;

/// The remote singleton policy document
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetch the current policy text.
    ///
    /// `Err(StoreError::NotFound)` when no policy exists. `Ok(None)` when the
    /// service answered without a body.
    async fn get_policy(&self) -> Result<Option<String>>;

    /// Replace the entire remote policy.
    async fn put_policy(&self, policy_json: &str, hybrid: HybridMode) -> Result<()>;

    /// Remove the remote policy entirely.
    async fn delete_policy(&self) -> Result<()>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
