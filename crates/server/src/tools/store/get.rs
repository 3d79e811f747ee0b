//! store_get tool implementation.
//!
//! Reads a stored response directly, bypassing classification.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::ServiceWorker;
use shellcache_core::{Error, InterceptedRequest};

use crate::tools::{HeaderPair, header_pairs, json_result};

/// Parameters for the store_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreGetParams {
    /// Absolute URL, or a path resolved against the application origin.
    pub url: String,

    /// HTTP method the entry was stored under (default: GET).
    #[serde(default)]
    pub method: Option<String>,

    /// Store to read from (default: the configured store).
    #[serde(default)]
    pub store: Option<String>,
}

/// Output from the store_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreGetOutput {
    pub store: String,
    pub url: String,
    pub status: u16,
    pub headers: Vec<HeaderPair>,
    pub body: String,
}

/// Implementation of the store_get tool.
pub async fn get_impl(worker: &ServiceWorker, params: StoreGetParams) -> Result<CallToolResult, McpError> {
    let name = params.store.unwrap_or_else(|| worker.store_name().to_string());
    let method = params.method.as_deref().unwrap_or("GET");
    let request = InterceptedRequest::parse(method, &params.url, Some(worker.base_url()))?;

    if !worker.db().has_store(&name).await? {
        return Err(Error::StoreMiss(format!("no store named {name}")).into());
    }

    let store = worker.db().open_store(&name).await?;
    let response = store
        .lookup(&request)
        .await?
        .ok_or_else(|| Error::StoreMiss(request.url().to_string()))?;

    let output = StoreGetOutput {
        store: name,
        url: request.url().to_string(),
        status: response.status,
        headers: header_pairs(&response.headers),
        body: response.body_text(),
    };
    json_result(&output)
}
