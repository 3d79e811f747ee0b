//! sw_install, sw_activate and sw_status tool implementations.
//!
//! Each call runs the lifecycle step to completion before answering, so
//! the client observes the event as finished only once its work is done.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{ServiceWorker, WorkerStatus};
use shellcache_core::StoreInfo;

use super::json_result;

/// Output from the sw_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwStatusOutput {
    #[serde(flatten)]
    pub worker: WorkerStatus,
    /// Every store present in the database.
    pub stores: Vec<StoreInfo>,
}

/// Implementation of the sw_install tool.
pub async fn install_impl(worker: &ServiceWorker) -> Result<CallToolResult, McpError> {
    let report = worker.install().await?;
    json_result(&report)
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl(worker: &ServiceWorker) -> Result<CallToolResult, McpError> {
    let report = worker.activate().await?;
    json_result(&report)
}

/// Implementation of the sw_status tool.
pub async fn status_impl(worker: &ServiceWorker) -> Result<CallToolResult, McpError> {
    let stores = worker.db().list_stores().await?;
    let output = SwStatusOutput { worker: worker.status().await, stores };
    json_result(&output)
}
