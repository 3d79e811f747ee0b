//! Lifecycle controller.
//!
//! A [`ServiceWorker`] owns everything the interception layer needs (store
//! database, classifier, executor, network) and moves through
//! `Parsed → Installing → Installed → Activating → Activated`.
//!
//! - `install` opens the store and precaches the shell. Whatever the
//!   populate result, the worker is ready to activate right away; it does
//!   not wait for older versions to finish.
//! - `activate` claims the store and starts controlling traffic at once.
//! - `handle_fetch` only intercepts once the worker is active.
//!
//! Each method is async; the event is complete when its future resolves.

use crate::network::Network;
use crate::precache;
use crate::strategy::{Executor, Outcome};
use serde::{Deserialize, Serialize};
use shellcache_core::{AppConfig, Classifier, Error, InterceptedRequest, Store, StoreDb, Strategy};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

/// What `install` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InstallReport {
    pub store: String,
    pub assets: usize,
    pub cached: usize,
    pub populated: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

/// What `activate` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ActivateReport {
    pub active_store: String,
    pub evicted: u64,
}

/// Snapshot of the worker for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkerStatus {
    pub phase: Phase,
    pub store_name: String,
    pub active_store: Option<String>,
    pub assets: usize,
}

/// Why a request was left to default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughReason {
    /// The worker is not active yet.
    NotControlling,
    /// The classifier declined the request.
    Unmanaged,
}

/// Result of intercepting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDisposition {
    Respond { strategy: Strategy, outcome: Outcome },
    Passthrough(PassthroughReason),
}

#[derive(Debug)]
struct State {
    phase: Phase,
    active: Option<Store>,
}

/// Request interception context with an explicit install/activate lifecycle.
pub struct ServiceWorker {
    db: StoreDb,
    store_name: String,
    base: Url,
    classifier: Classifier,
    executor: Executor,
    network: Arc<dyn Network>,
    precache_concurrency: usize,
    max_asset_bytes: usize,
    evict_stale_stores: bool,
    state: RwLock<State>,
}

impl ServiceWorker {
    pub fn new(config: &AppConfig, db: StoreDb, network: Arc<dyn Network>) -> Result<Self, Error> {
        let base = config.app_origin_url().map_err(|e| Error::Config(e.to_string()))?;
        let classifier = Classifier::from_config(config)?;
        let executor = Executor::new(network.clone(), &config.fallback)?;

        Ok(Self {
            db,
            store_name: config.store_name.clone(),
            base,
            classifier,
            executor,
            network,
            precache_concurrency: config.precache_concurrency,
            max_asset_bytes: config.max_bytes,
            evict_stale_stores: config.evict_stale_stores,
            state: RwLock::new(State { phase: Phase::Parsed, active: None }),
        })
    }

    /// Open the store and precache the shell.
    ///
    /// A failed populate is reported in the returned [`InstallReport`], not
    /// as an error; the worker still becomes installed. Only a store that
    /// cannot be opened fails the call.
    pub async fn install(&self) -> Result<InstallReport, Error> {
        let previous = self.advance_to(Phase::Installing).await;
        tracing::info!(store = %self.store_name, "installing and precaching the app shell");

        let store = match self.db.open_store(&self.store_name).await {
            Ok(store) => store,
            Err(e) => {
                self.state.write().await.phase = previous;
                return Err(e);
            }
        };

        let registry = self.classifier.registry();
        let result = precache::populate(
            &store,
            registry,
            &self.base,
            self.network.as_ref(),
            self.precache_concurrency,
            self.max_asset_bytes,
        )
        .await;

        let phase = self.advance_to(Phase::Installed).await.max(Phase::Installed);

        let report = match result {
            Ok(populated) => InstallReport {
                store: store.name().to_string(),
                assets: registry.len(),
                cached: populated.cached,
                populated: true,
                error: None,
                phase,
            },
            Err(e) => {
                tracing::warn!(store = %self.store_name, error = %e, "precache failed; shell requests will miss");
                InstallReport {
                    store: store.name().to_string(),
                    assets: registry.len(),
                    cached: 0,
                    populated: false,
                    error: Some(e.to_string()),
                    phase,
                }
            }
        };

        Ok(report)
    }

    /// Claim the store and start controlling traffic immediately.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `install` has not completed, or a
    /// database error if the store cannot be claimed.
    pub async fn activate(&self) -> Result<ActivateReport, Error> {
        if self.phase().await < Phase::Installed {
            return Err(Error::InvalidInput("worker must be installed before activation".into()));
        }

        let previous = self.advance_to(Phase::Activating).await;
        tracing::info!(store = %self.store_name, "activating");

        match self.claim_and_evict().await {
            Ok(report) => {
                self.state.write().await.phase = Phase::Activated;
                tracing::info!(store = %report.active_store, evicted = report.evicted, "worker active");
                Ok(report)
            }
            Err(e) => {
                self.state.write().await.phase = previous;
                Err(e)
            }
        }
    }

    /// Eviction runs before the claim so a failed eviction leaves the worker
    /// not controlling.
    async fn claim_and_evict(&self) -> Result<ActivateReport, Error> {
        let evicted =
            if self.evict_stale_stores { self.db.delete_stores_except(&self.store_name).await? } else { 0 };

        let store = self.claim_active_store(&self.store_name).await?;

        Ok(ActivateReport { active_store: store.name().to_string(), evicted })
    }

    /// Make `name` the store used for every request handled from now on.
    ///
    /// Idempotent; claiming the already-active store changes nothing.
    pub async fn claim_active_store(&self, name: &str) -> Result<Store, Error> {
        let store = self.db.open_store(name).await?;
        self.state.write().await.active = Some(store.clone());
        Ok(store)
    }

    /// Intercept one request.
    pub async fn handle_fetch(&self, request: &InterceptedRequest) -> FetchDisposition {
        let active = self.state.read().await.active.clone();
        let Some(store) = active else {
            tracing::debug!(url = %request.url(), "worker not controlling; passthrough");
            return FetchDisposition::Passthrough(PassthroughReason::NotControlling);
        };

        let strategy = self.classifier.classify(request);
        tracing::debug!(url = %request.url(), method = request.method(), strategy = strategy.as_str(), "classified");

        match strategy {
            Strategy::Shell => {
                FetchDisposition::Respond { strategy, outcome: self.executor.run_shell(&store, request).await }
            }
            Strategy::RemoteSearch => {
                FetchDisposition::Respond { strategy, outcome: self.executor.run_remote_search(request).await }
            }
            Strategy::Unmanaged => FetchDisposition::Passthrough(PassthroughReason::Unmanaged),
        }
    }

    pub fn classify(&self, request: &InterceptedRequest) -> Strategy {
        self.classifier.classify(request)
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    pub async fn status(&self) -> WorkerStatus {
        let state = self.state.read().await;
        WorkerStatus {
            phase: state.phase,
            store_name: self.store_name.clone(),
            active_store: state.active.as_ref().map(|s| s.name().to_string()),
            assets: self.classifier.registry().len(),
        }
    }

    /// Name of the store this worker version installs into.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Application origin that relative request URLs resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Network used for strategies; also the default path for passthrough.
    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    pub fn db(&self) -> &StoreDb {
        &self.db
    }

    /// Move forward to `phase` unless already past it; returns the previous phase.
    async fn advance_to(&self, phase: Phase) -> Phase {
        let mut state = self.state.write().await;
        let previous = state.phase;
        if previous < phase {
            state.phase = phase;
        }
        previous
    }
}
