//! Configuration for the lifecycle handler

use catalog_policy_store::{FileSystemPolicyStore, InMemoryPolicyStore, PolicyStore};
use catalog_policy_types::DEFAULT_POLICY_VERSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CATALOG_POLICY";

/// Main handler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Policy document settings
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Remote store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Policy document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Version written when no remote document exists
    #[serde(default = "default_policy_version")]
    pub default_version: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_version: default_policy_version(),
        }
    }
}

/// Store backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory store (dry runs and tests)
    #[default]
    Memory,

    /// JSON file on local disk
    File {
        /// Path of the policy file
        path: PathBuf,
    },
}

impl StoreConfig {
    /// Instantiate the configured backend
    pub fn build(&self) -> Arc<dyn PolicyStore> {
        match self {
            StoreConfig::Memory => Arc::new(InMemoryPolicyStore::new()),
            StoreConfig::File { path } => Arc::new(FileSystemPolicyStore::new(path.clone())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_policy_version() -> String {
    DEFAULT_POLICY_VERSION.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl HandlerConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `CATALOG_POLICY_*` environment variables (`__` separates sections,
    /// e.g. `CATALOG_POLICY_LOGGING__LEVEL=debug`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&HandlerConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HandlerConfig::default();
        assert_eq!(config.policy.default_version, "2012-10-17");
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handler.json");
        std::fs::write(
            &path,
            r#"{
                "policy": {"default_version": "2008-10-17"},
                "store": {"type": "file", "path": "/var/lib/catalog-policy/policy.json"},
                "logging": {"level": "debug", "json": true}
            }"#,
        )
        .unwrap();

        let config = HandlerConfig::load(path.to_str()).unwrap();
        assert_eq!(config.policy.default_version, "2008-10-17");
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: PathBuf::from("/var/lib/catalog-policy/policy.json")
            }
        );
        assert!(config.logging.json);
    }

    #[test]
    fn test_store_config_tagging() {
        let parsed: StoreConfig = serde_json::from_str(r#"{"type":"memory"}"#).unwrap();
        assert_eq!(parsed, StoreConfig::Memory);
        assert_eq!(parsed.build().name(), "memory");
    }
}
