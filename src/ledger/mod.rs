//! Download ledger module.
//!
//! Provides:
//! - Download records for completed books
//! - The ledger contract used by the sync engine
//! - JSON file and in-memory ledgers

pub mod json;
pub mod memory;
pub mod record;
pub mod store;

pub use json::JsonLedger;
pub use memory::MemoryLedger;
pub use record::DownloadRecord;
pub use store::Ledger;
