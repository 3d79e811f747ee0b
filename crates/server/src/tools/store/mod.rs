//! Store maintenance tools.

pub mod get;
pub mod purge;

pub use get::{StoreGetOutput, StoreGetParams, get_impl};
pub use purge::{StorePurgeOutput, StorePurgeParams, purge_impl};
