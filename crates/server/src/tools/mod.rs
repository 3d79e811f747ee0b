//! MCP tool implementations.
//!
//! Lifecycle events (`sw_install`, `sw_activate`), request interception
//! (`sw_fetch`), status, and store maintenance.
#![allow(unused_imports)]

pub mod fetch;
pub mod lifecycle;
pub mod store;

pub use fetch::{SwFetchOutput, SwFetchParams};
pub use lifecycle::SwStatusOutput;
pub use store::{StoreGetOutput, StoreGetParams, StorePurgeOutput, StorePurgeParams};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use shellcache_core::Error;

/// A header as exposed to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

pub(crate) fn header_pairs(headers: &[(String, String)]) -> Vec<HeaderPair> {
    headers
        .iter()
        .map(|(name, value)| HeaderPair { name: name.clone(), value: value.clone() })
        .collect()
}

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::Serialization(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
