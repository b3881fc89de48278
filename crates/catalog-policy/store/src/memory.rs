//! In-memory policy store
//!
//! Deterministic and test-friendly. Every call is appended to a journal so
//! callers can assert which remote operations were (and were not) issued, and
//! a failure can be queued for the next call of each kind.

use crate::error::{Result, StoreError};
use crate::traits::PolicyStore;
use async_trait::async_trait;
use catalog_policy_types::HybridMode;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// One call observed by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    Get,
    Put {
        policy_json: String,
        hybrid: HybridMode,
    },
    Delete,
}

impl StoreOperation {
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreOperation::Get)
    }
}

#[derive(Debug, Clone)]
struct StoredPolicy {
    json: String,
    hybrid: HybridMode,
}

#[derive(Default)]
struct QueuedFaults {
    get: Option<StoreError>,
    put: Option<StoreError>,
    delete: Option<StoreError>,
}

/// In-memory policy store
pub struct InMemoryPolicyStore {
    policy: RwLock<Option<StoredPolicy>>,
    journal: Mutex<Vec<StoreOperation>>,
    faults: Mutex<QueuedFaults>,
}

impl InMemoryPolicyStore {
    /// Store with no policy; `get_policy` reports not-found
    pub fn new() -> Self {
        Self {
            policy: RwLock::new(None),
            journal: Mutex::new(Vec::new()),
            faults: Mutex::new(QueuedFaults::default()),
        }
    }

    /// Store seeded with an existing policy document
    pub fn with_policy(policy_json: impl Into<String>) -> Self {
        Self {
            policy: RwLock::new(Some(StoredPolicy {
                json: policy_json.into(),
                hybrid: HybridMode::default(),
            })),
            ..Self::new()
        }
    }

    /// Current policy text, if any
    pub async fn current(&self) -> Option<String> {
        self.policy.read().await.as_ref().map(|p| p.json.clone())
    }

    /// Hybrid flag sent with the last successful put
    pub async fn last_hybrid(&self) -> Option<HybridMode> {
        self.policy.read().await.as_ref().map(|p| p.hybrid)
    }

    pub async fn journal(&self) -> Vec<StoreOperation> {
        self.journal.lock().await.clone()
    }

    /// Number of put/delete calls received, failed ones included
    pub async fn write_count(&self) -> usize {
        self.journal
            .lock()
            .await
            .iter()
            .filter(|op| op.is_write())
            .count()
    }

    pub async fn fail_next_get(&self, error: StoreError) {
        self.faults.lock().await.get = Some(error);
    }

    pub async fn fail_next_put(&self, error: StoreError) {
        self.faults.lock().await.put = Some(error);
    }

    pub async fn fail_next_delete(&self, error: StoreError) {
        self.faults.lock().await.delete = Some(error);
    }

    async fn record(&self, op: StoreOperation) {
        self.journal.lock().await.push(op);
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get_policy(&self) -> Result<Option<String>> {
        self.record(StoreOperation::Get).await;
        if let Some(err) = self.faults.lock().await.get.take() {
            return Err(err);
        }

        match self.policy.read().await.as_ref() {
            Some(stored) => Ok(Some(stored.json.clone())),
            None => Err(StoreError::NotFound),
        }
    }

    async fn put_policy(&self, policy_json: &str, hybrid: HybridMode) -> Result<()> {
        self.record(StoreOperation::Put {
            policy_json: policy_json.to_string(),
            hybrid,
        })
        .await;
        if let Some(err) = self.faults.lock().await.put.take() {
            return Err(err);
        }

        *self.policy.write().await = Some(StoredPolicy {
            json: policy_json.to_string(),
            hybrid,
        });
        debug!(bytes = policy_json.len(), %hybrid, "Stored policy in memory");
        Ok(())
    }

    async fn delete_policy(&self) -> Result<()> {
        self.record(StoreOperation::Delete).await;
        if let Some(err) = self.faults.lock().await.delete.take() {
            return Err(err);
        }

        // Deleting an absent policy is reported the way the catalog does.
        match self.policy.write().await.take() {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
