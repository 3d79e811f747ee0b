//! shellcache server entry point.
//!
//! Boots the request interception worker and exposes its lifecycle and
//! fetch events as MCP tools on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shellcache_client::{HttpNetwork, NetworkConfig, ServiceWorker};
use shellcache_core::{AppConfig, StoreDb};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        store = %config.store_name,
        db_path = %config.db_path.display(),
        app_origin = %config.app_origin,
        "Starting shellcache server on stdio transport"
    );

    let db = StoreDb::open(&config.db_path).await?;
    let network = Arc::new(HttpNetwork::new(NetworkConfig::from(&config))?);
    let worker = Arc::new(ServiceWorker::new(&config, db, network)?);

    let handler = handler::ShellcacheServer::new(worker);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
