//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    fetch::{SwFetchParams, fetch_impl},
    lifecycle::{activate_impl, install_impl, status_impl},
    store::{StoreGetParams, StorePurgeParams, get_impl, purge_impl},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shellcache_client::ServiceWorker;
use std::sync::Arc;

/// The main MCP server handler for shellcache.
#[derive(Clone)]
pub struct ShellcacheServer {
    worker: Arc<ServiceWorker>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ShellcacheServer {
    /// Create a new server handler around a worker.
    pub fn new(worker: Arc<ServiceWorker>) -> Self {
        Self { worker, tool_router: Self::tool_router() }
    }

    /// Install lifecycle event: open the store and precache the app shell.
    #[tool(description = "Install event. Opens the versioned store and precaches every app-shell asset \
                          (all-or-nothing). Returns whether population succeeded.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker).await
    }

    /// Activate lifecycle event: claim the store and start intercepting.
    #[tool(description = "Activate event. Claims the installed store and starts intercepting requests immediately.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker).await
    }

    /// Fetch event: classify a request and fulfil it.
    #[tool(description = "Fetch event. Classifies the request (shell, remote_search, unmanaged) and returns the \
                          response the page would receive.")]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, params.0).await
    }

    /// Report lifecycle phase and stores.
    #[tool(description = "Report the worker lifecycle phase, the active store, and every store on disk.")]
    async fn sw_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.worker).await
    }

    /// Read a stored response directly.
    #[tool(description = "Read a stored response from a named store without classification.")]
    async fn store_get(&self, params: Parameters<StoreGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.worker, params.0).await
    }

    /// Delete stale stores.
    #[tool(description = "Delete every store except the one to keep (default: the configured store).")]
    async fn store_purge(&self, params: Parameters<StorePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.worker, params.0).await
    }
}

impl ServerHandler for ShellcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shellcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{EchoNetwork, worker};

    #[tokio::test]
    async fn test_router_lists_all_tools() {
        let server = ShellcacheServer::new(worker(Arc::new(EchoNetwork::default())).await);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["store_get", "store_purge", "sw_activate", "sw_fetch", "sw_install", "sw_status"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_install_and_activate_from_spawned_tasks() {
        let server = ShellcacheServer::new(worker(Arc::new(EchoNetwork::default())).await);

        let installer = server.clone();
        let result = tokio::spawn(async move { installer.sw_install().await }).await.unwrap();
        assert!(result.is_ok());

        let activator = server.clone();
        let result = tokio::spawn(async move { activator.sw_activate().await }).await.unwrap();
        assert!(result.is_ok());
    }
}
