//! Catalog Policy Handler - Lifecycle event entry point
//!
//! Reads one lifecycle event (from a file or stdin), reconciles it against the
//! configured policy store and prints the response JSON on stdout. Logs go to
//! stderr so the response can be piped.

use anyhow::Context;
use catalog_policy_reconciler::{HandlerConfig, LifecycleEvent, PolicyReconciler};
use catalog_policy_store::FileSystemPolicyStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Catalog Policy Handler CLI
#[derive(Parser)]
#[command(name = "catalog-policy-handler")]
#[command(about = "Reconcile one policy statement lifecycle event", long_about = None)]
#[command(version)]
struct Cli {
    /// Event file, or `-` for stdin
    #[arg(short, long, env = "CATALOG_POLICY_EVENT", default_value = "-")]
    event: String,

    /// Configuration file path
    #[arg(short, long, env = "CATALOG_POLICY_CONFIG")]
    config: Option<String>,

    /// Keep the policy in this directory instead of the configured store
    #[arg(long, env = "CATALOG_POLICY_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "CATALOG_POLICY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "CATALOG_POLICY_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = HandlerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let reconciler = match &cli.store_dir {
        Some(dir) => PolicyReconciler::new(Arc::new(FileSystemPolicyStore::in_dir(dir)))
            .with_default_version(config.policy.default_version.clone()),
        None => PolicyReconciler::from_config(&config),
    };
    info!(store = reconciler.store().name(), "Policy store ready");

    let raw = read_event(&cli.event).await?;
    let event = LifecycleEvent::from_json(&raw).context("Failed to parse lifecycle event")?;

    let response = reconciler
        .handle_event(&event)
        .await
        .with_context(|| format!("{} failed for {}", event.request_type, event.resource_properties.sid))?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn read_event(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read event from stdin")?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read event file {}", source))
    }
}
