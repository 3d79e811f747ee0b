//! Core types and shared functionality for shellcache.
//!
//! This crate provides:
//! - The application-shell asset registry and the offline fallback payload
//! - Request/response value types and URL canonicalization
//! - Request classification (shell, remote search, unmanaged)
//! - The SQLite-backed response store
//! - Unified error types
//! - Configuration structures

pub mod assets;
pub mod classify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod request;
pub mod response;
pub mod store;

pub use assets::{AssetRegistry, MatchMode};
pub use classify::{Classifier, Strategy};
pub use config::AppConfig;
pub use error::Error;
pub use fallback::{Drink, FallbackPayload};
pub use request::InterceptedRequest;
pub use response::Response;
pub use store::{Store, StoreDb, StoreEntry, StoreInfo};
