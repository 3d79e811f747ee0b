//! Bulk population of a store from the asset registry.
//!
//! Every asset is resolved against the application origin, fetched, and
//! only then written. A single failed fetch, non-2xx status or oversized
//! body aborts the whole batch before anything touches the store.

use crate::network::Network;
use futures_util::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use shellcache_core::{AssetRegistry, Error, InterceptedRequest, Store, StoreEntry};
use std::time::Instant;
use url::Url;

/// Result of a successful populate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateReport {
    pub store: String,
    pub cached: usize,
    pub fetch_ms: u64,
}

/// Fetch every registry entry and commit them to `store` atomically.
///
/// # Errors
///
/// Returns `Error::PopulateFailed` naming the first asset that could not be
/// resolved or fetched, returned a non-2xx status, or whose body exceeds
/// `max_bytes`. Returns
/// `Error::Database` if the final write fails; the transaction is rolled
/// back in that case too.
pub async fn populate(
    store: &Store, registry: &AssetRegistry, base: &Url, network: &dyn Network, concurrency: usize, max_bytes: usize,
) -> Result<PopulateReport, Error> {
    let start = Instant::now();

    let paths: Vec<String> = registry.iter().map(str::to_owned).collect();
    let entries: Vec<StoreEntry> = stream::iter(paths)
        .map(move |path| async move { fetch_asset(&path, base, network, max_bytes).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let cached = store.put_all(entries).await?;
    let fetch_ms = start.elapsed().as_millis() as u64;

    tracing::info!(store = store.name(), cached, fetch_ms, "shell precached");

    Ok(PopulateReport { store: store.name().to_string(), cached, fetch_ms })
}

async fn fetch_asset(path: &str, base: &Url, network: &dyn Network, max_bytes: usize) -> Result<StoreEntry, Error> {
    let failed = |reason: String| Error::PopulateFailed { path: path.to_string(), reason };

    let url = base.join(path).map_err(|e| failed(e.to_string()))?;
    let request = InterceptedRequest::get(url);

    let response = network.fetch(&request).await.map_err(|e| failed(e.to_string()))?;
    if !response.is_ok() {
        return Err(failed(format!("status {}", response.status)));
    }
    if response.body.len() > max_bytes {
        return Err(failed(format!("response too large: {} bytes exceeds {max_bytes}", response.body.len())));
    }

    tracing::debug!(asset = path, url = %request.url(), bytes = response.body.len(), "asset fetched");

    Ok(StoreEntry { request, response })
}
