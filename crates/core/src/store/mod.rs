//! SQLite-backed response store.
//!
//! A persistent mapping from request identity to a stored response,
//! partitioned into named stores (one per worker version tag). It supports:
//!
//! - Idempotent store creation by name
//! - All-or-nothing bulk insertion inside a single transaction
//! - Point lookup by method + canonical URL
//! - Store listing and eviction of stale versions

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::StoreDb;
pub use entries::{Store, StoreEntry, StoreInfo};
