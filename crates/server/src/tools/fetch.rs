//! sw_fetch tool implementation.
//!
//! Hands one request to the worker. Requests the worker does not take
//! (unmanaged, or before activation) go straight to the network, which is
//! the default handling an uncontrolled page would get.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{FetchDisposition, Network, PassthroughReason, ServiceWorker, Terminal};
use shellcache_core::{Error, InterceptedRequest, Strategy};

use super::{HeaderPair, header_pairs, json_result};

/// Parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL, or a path resolved against the application origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output from the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    pub url: String,
    pub method: String,
    /// Classification of the request.
    pub strategy: Strategy,
    /// Terminal state when the worker produced the response.
    pub terminal: Option<Terminal>,
    /// Why the worker left the request alone, if it did.
    pub passthrough: Option<PassthroughReason>,
    pub status: u16,
    pub headers: Vec<HeaderPair>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(worker: &ServiceWorker, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let request = InterceptedRequest::parse(&params.method, &params.url, Some(worker.base_url()))?;

    let output = match worker.handle_fetch(&request).await {
        FetchDisposition::Respond { strategy, outcome } => SwFetchOutput {
            url: request.url().to_string(),
            method: request.method().to_string(),
            strategy,
            terminal: Some(outcome.terminal),
            passthrough: None,
            status: outcome.response.status,
            headers: header_pairs(&outcome.response.headers),
            body: outcome.response.body_text(),
        },
        FetchDisposition::Passthrough(reason) => {
            tracing::debug!(url = %request.url(), ?reason, "default network handling");
            let response = worker.network().fetch(&request).await.map_err(Error::from)?;
            SwFetchOutput {
                url: request.url().to_string(),
                method: request.method().to_string(),
                strategy: worker.classify(&request),
                terminal: None,
                passthrough: Some(reason),
                status: response.status,
                headers: header_pairs(&response.headers),
                body: response.body_text(),
            }
        }
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{EchoNetwork, output, worker};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn params(url: &str) -> SwFetchParams {
        SwFetchParams { url: url.into(), method: default_method() }
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let worker = worker(Arc::new(EchoNetwork::default())).await;
        assert!(fetch_impl(&worker, params("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_before_activation_passes_through() {
        let network = Arc::new(EchoNetwork::default());
        let worker = worker(network.clone()).await;

        let result = fetch_impl(&worker, params("/index.html")).await.unwrap();
        let out: SwFetchOutput = output(&result);

        assert_eq!(out.strategy, Strategy::Shell);
        assert_eq!(out.passthrough, Some(PassthroughReason::NotControlling));
        assert_eq!(out.body, "live /index.html");
        assert_eq!(network.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_shell_hit_after_activation() {
        let network = Arc::new(EchoNetwork::default());
        let worker = worker(network.clone()).await;
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        network.offline.store(true, Ordering::SeqCst);

        let result = fetch_impl(&worker, params("/index.html")).await.unwrap();
        let out: SwFetchOutput = output(&result);

        assert_eq!(out.url, "http://localhost:8080/index.html");
        assert_eq!(out.terminal, Some(Terminal::ShellHit));
        assert_eq!(out.status, 200);
        assert_eq!(out.body, "live /index.html");
    }

    #[tokio::test]
    async fn test_fetch_search_offline_fallback() {
        let network = Arc::new(EchoNetwork::default());
        let worker = worker(network.clone()).await;
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        network.offline.store(true, Ordering::SeqCst);

        let url = "https://www.thecocktaildb.com/api/json/v1/1/search.php?s=margarita";
        let result = fetch_impl(&worker, params(url)).await.unwrap();
        let out: SwFetchOutput = output(&result);

        assert_eq!(out.strategy, Strategy::RemoteSearch);
        assert_eq!(out.terminal, Some(Terminal::RemoteFallback));
        assert!(out.headers.contains(&HeaderPair { name: "content-type".into(), value: "application/json".into() }));
        assert!(out.body.contains("\"idDrink\":\"00000\""));
    }

    #[tokio::test]
    async fn test_fetch_unmanaged_network_failure_is_error() {
        let network = Arc::new(EchoNetwork::default());
        let worker = worker(network.clone()).await;
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        network.offline.store(true, Ordering::SeqCst);

        let err = fetch_impl(&worker, params("https://images.example.org/lime.png")).await.unwrap_err();
        assert_eq!(err.code.0, -32005);
    }
}
