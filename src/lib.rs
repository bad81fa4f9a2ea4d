//! audiobook-sync - keep a local copy of a purchased audiobook library
//!
//! This library provides the pieces of a library sync: logging in, paging
//! through the remote catalog, working out which books are not on disk yet,
//! and downloading them while keeping a durable ledger of finished books.
//!
//! # Features
//!
//! - Password login with the token persisted in the config file
//! - Paginated catalog listing that degrades to a partial result on failure
//! - Ledger-based diffing so repeated runs only fetch new purchases
//! - Staged downloads that never leave a half-written book in place
//! - Archive extraction with optional archive retention
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use audiobook_sync::{
//!     Config, HttpTransfer, JsonLedger, LibraryApi, SyncEngine, SyncOptions, TerminalPrompt,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::load(Path::new("config.toml"))?;
//!     let api = LibraryApi::new(&config.options.api_base_url)?;
//!     let engine = SyncEngine::new(
//!         Arc::new(api.clone()),
//!         Arc::new(JsonLedger::open(config.ledger_path()).await?),
//!         Arc::new(HttpTransfer::new(api, true)),
//!         Arc::new(TerminalPrompt::new()),
//!     );
//!
//!     let (stats, _) =
//!         audiobook_sync::sync_library(&engine, &mut config.session, &SyncOptions::default())
//!             .await?;
//!     println!("{} downloaded", stats.downloaded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod output;
pub mod prompt;
pub mod sync;
pub mod transfer;

// Re-exports for convenience
pub use api::{CatalogGateway, LibraryApi};
pub use catalog::{CatalogItem, CatalogSnapshot, DownloadMetadata};
pub use config::{Config, Session, SessionUpdate};
pub use error::{Error, Result};
pub use ledger::{DownloadRecord, JsonLedger, Ledger, MemoryLedger};
pub use prompt::{Prompt, TerminalPrompt};
pub use sync::{sync_library, RunStats, SyncEngine, SyncOptions};
pub use transfer::{HttpTransfer, Transfer};
