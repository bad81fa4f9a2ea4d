//! Sync module.
//!
//! This module provides:
//! - The sync engine (session setup, catalog paging, diffing, per-book download)
//! - The batch driver that runs a whole sync pass
//! - Run statistics

pub mod batch;
pub mod engine;
pub mod logged;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{sync_library, SyncOptions};
pub use engine::SyncEngine;
pub use logged::logged;
pub use state::RunStats;
