//! Client code for shellcache.
//!
//! This crate provides the network boundary, shell precaching, the
//! fulfillment strategies, and the lifecycle controller that ties them to
//! the store and classifier from `shellcache-core`.

pub mod network;
pub mod precache;
pub mod strategy;
pub mod worker;

#[cfg(test)]
mod testing;

pub use network::{HttpNetwork, Network, NetworkConfig, NetworkError};
pub use precache::{PopulateReport, populate};
pub use strategy::{Executor, Outcome, SHELL_MISS_BODY, Terminal};
pub use worker::{ActivateReport, FetchDisposition, InstallReport, PassthroughReason, Phase, ServiceWorker, WorkerStatus};
