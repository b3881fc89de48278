//! Filesystem-backed policy store
//!
//! The policy lives in a single JSON file holding the policy text and the
//! hybrid flag of the last write. A missing file means no policy exists.
//! Writes are atomic (write to `.tmp`, then rename) so an interrupted put
//! never leaves a partially written document behind.

use crate::error::{Result, StoreError};
use crate::traits::PolicyStore;
use async_trait::async_trait;
use catalog_policy_types::HybridMode;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used inside a store directory
pub const POLICY_FILE_NAME: &str = "resource-policy.json";

#[derive(Debug, Serialize, Deserialize)]
struct PolicyFile {
    #[serde(rename = "PolicyInJson")]
    policy_json: String,
    #[serde(rename = "EnableHybrid")]
    hybrid: HybridMode,
}

/// Policy store persisted to a local JSON file
pub struct FileSystemPolicyStore {
    path: PathBuf,
}

impl FileSystemPolicyStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store using [`POLICY_FILE_NAME`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(POLICY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<PolicyFile> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents).map_err(|e| {
            StoreError::Backend(format!(
                "corrupt policy file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl PolicyStore for FileSystemPolicyStore {
    async fn get_policy(&self) -> Result<Option<String>> {
        let file = self.read_file().await?;
        if file.policy_json.is_empty() {
            return Ok(None);
        }
        Ok(Some(file.policy_json))
    }

    async fn put_policy(&self, policy_json: &str, hybrid: HybridMode) -> Result<()> {
        let file = PolicyFile {
            policy_json: policy_json.to_string(),
            hybrid,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| StoreError::Backend(format!("serialization failed: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic write: write to .tmp then rename
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), %hybrid, "Wrote policy file");
        Ok(())
    }

    async fn delete_policy(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}
