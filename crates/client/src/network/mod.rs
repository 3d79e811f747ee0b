//! Network boundary.
//!
//! ### Contract
//! - [`Network::fetch`] forwards a request unmodified and returns whatever
//!   the server answered, including 4xx/5xx statuses.
//! - Only transport failures (DNS, connect, timeout, body read) surface as
//!   [`NetworkError`]. No body size limit is applied here; the precache step
//!   bounds what it writes into the store.
//!
//! ### HTTP implementation
//! - reqwest with rustls, gzip/brotli/deflate decoding
//! - Max redirects: 5

pub mod error;

pub use error::NetworkError;

use reqwest::{Client, Method, header};
use shellcache_core::{AppConfig, InterceptedRequest, Response};
use std::time::{Duration, Instant};

/// Outbound HTTP seam used by the precache step and the strategies.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    /// Perform the request once; no retries.
    async fn fetch(&self, request: &InterceptedRequest) -> Result<Response, NetworkError>;
}

/// Configuration for the HTTP network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// User agent string (default: "shellcache/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: "shellcache/0.1".to_string(),
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for NetworkConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// reqwest-backed [`Network`].
pub struct HttpNetwork {
    http: Client,
    config: NetworkConfig,
}

impl HttpNetwork {
    /// Create a new HTTP network with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| NetworkError::Build(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &InterceptedRequest) -> Result<Response, NetworkError> {
        let start = Instant::now();
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|e| NetworkError::Build(format!("invalid method {}: {e}", request.method())))?;

        let response = self.http.request(method, request.url().as_str()).send().await?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;

        tracing::debug!(
            url = %request.url(),
            status = status.as_u16(),
            bytes = bytes.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "network fetch complete"
        );

        Ok(Response::new(status.as_u16(), headers, bytes))
    }
}

fn collect_headers(headers: &header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
        .collect()
}
