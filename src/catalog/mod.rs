//! Catalog module for audiobook representation.
//!
//! Provides:
//! - Catalog items as reported by the remote library
//! - Point-in-time catalog snapshots
//! - Resolved download metadata

pub mod item;
pub mod metadata;
pub mod snapshot;

pub use item::CatalogItem;
pub use metadata::DownloadMetadata;
pub use snapshot::CatalogSnapshot;
