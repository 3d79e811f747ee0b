//! Fulfillment strategies.
//!
//! - **Shell** (cache-only): store hit is returned verbatim; a miss becomes a
//!   500 response. The network is never consulted.
//! - **Remote search** (network-first): the live response is returned
//!   verbatim whatever its status; a transport failure becomes the static
//!   fallback payload. Nothing is written to the store.

use crate::network::Network;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shellcache_core::{Error, FallbackPayload, InterceptedRequest, Response, Store};
use std::sync::Arc;

/// Body of the synthetic response for a shell asset missing from the store.
pub const SHELL_MISS_BODY: &str = "App Shell Asset Missing";

/// Terminal state reached by one handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    ShellHit,
    ShellMiss,
    RemoteSuccess,
    RemoteFallback,
}

/// The single response produced for a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub terminal: Terminal,
    pub response: Response,
}

/// Runs the shell and remote-search strategies.
pub struct Executor {
    network: Arc<dyn Network>,
    fallback_body: Bytes,
}

impl Executor {
    /// The fallback payload is serialized once up front.
    pub fn new(network: Arc<dyn Network>, fallback: &FallbackPayload) -> Result<Self, Error> {
        Ok(Self { network, fallback_body: fallback.to_body()? })
    }

    /// Cache-only lookup in `store`.
    ///
    /// A failed store read is reported like a miss so the caller still gets
    /// exactly one response.
    pub async fn run_shell(&self, store: &Store, request: &InterceptedRequest) -> Outcome {
        match store.lookup(request).await {
            Ok(Some(response)) => {
                tracing::debug!(url = %request.url(), store = store.name(), "shell hit");
                Outcome { terminal: Terminal::ShellHit, response }
            }
            Ok(None) => {
                tracing::warn!(url = %request.url(), store = store.name(), "shell asset missing from store");
                Outcome { terminal: Terminal::ShellMiss, response: shell_miss() }
            }
            Err(e) => {
                tracing::warn!(url = %request.url(), store = store.name(), error = %e, "shell lookup failed");
                Outcome { terminal: Terminal::ShellMiss, response: shell_miss() }
            }
        }
    }

    /// Network-first with the static fallback.
    pub async fn run_remote_search(&self, request: &InterceptedRequest) -> Outcome {
        match self.network.fetch(request).await {
            Ok(response) => {
                tracing::debug!(url = %request.url(), status = response.status, "remote search answered");
                Outcome { terminal: Terminal::RemoteSuccess, response }
            }
            Err(e) => {
                tracing::warn!(url = %request.url(), error = %e, "network failed; serving fallback payload");
                Outcome { terminal: Terminal::RemoteFallback, response: Response::json(200, self.fallback_body.clone()) }
            }
        }
    }
}

fn shell_miss() -> Response {
    Response::text(500, SHELL_MISS_BODY)
}
