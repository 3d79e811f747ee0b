//! store_purge tool implementation.
//!
//! Deletes every store except one, for clearing out old worker versions.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::ServiceWorker;
use shellcache_core::Error;

use crate::tools::json_result;

/// Parameters for the store_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StorePurgeParams {
    /// Store to keep (default: the configured store).
    #[serde(default)]
    pub keep: Option<String>,
}

/// Output from the store_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StorePurgeOutput {
    /// Store that was kept.
    pub kept: String,
    /// Number of stores deleted.
    pub deleted: u64,
}

/// Implementation of the store_purge tool.
pub async fn purge_impl(worker: &ServiceWorker, params: StorePurgeParams) -> Result<CallToolResult, McpError> {
    let kept = params.keep.unwrap_or_else(|| worker.store_name().to_string());

    if let Some(active) = worker.status().await.active_store
        && active != kept
    {
        return Err(Error::InvalidInput(format!("cannot purge the active store {active}")).into());
    }

    let deleted = worker.db().delete_stores_except(&kept).await?;

    tracing::info!(kept = %kept, deleted, "purged stale stores");

    json_result(&StorePurgeOutput { kept, deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{EchoNetwork, output, worker};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_purge_keeps_configured_store() {
        let worker = worker(Arc::new(EchoNetwork::default())).await;
        worker.db().open_store("cocktail-pwa-v1").await.unwrap();
        worker.db().open_store("cocktail-pwa-v2").await.unwrap();

        let result = purge_impl(&worker, StorePurgeParams { keep: None }).await.unwrap();
        let out: StorePurgeOutput = output(&result);

        assert_eq!(out.kept, "cocktail-pwa-v2");
        assert_eq!(out.deleted, 1);
        assert!(worker.db().has_store("cocktail-pwa-v2").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_explicit_keep() {
        let worker = worker(Arc::new(EchoNetwork::default())).await;
        worker.db().open_store("a").await.unwrap();
        worker.db().open_store("b").await.unwrap();

        let result = purge_impl(&worker, StorePurgeParams { keep: Some("a".into()) }).await.unwrap();
        let out: StorePurgeOutput = output(&result);

        assert_eq!(out.deleted, 1);
        assert!(!worker.db().has_store("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_refuses_active_store() {
        let worker = worker(Arc::new(EchoNetwork::default())).await;
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        worker.db().open_store("other").await.unwrap();

        let err = purge_impl(&worker, StorePurgeParams { keep: Some("other".into()) }).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(worker.db().has_store("cocktail-pwa-v2").await.unwrap());
    }
}
