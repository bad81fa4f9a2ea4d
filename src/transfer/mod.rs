//! Transfer module for fetching and storing book files.
//!
//! Provides:
//! - The transfer contract used by the sync engine
//! - HTTP transfer with staged, atomic placement
//! - Archive extraction
//! - Metadata sidecar files

pub mod archive;
pub mod contract;
pub mod http;
pub mod sidecar;

pub use contract::{Transfer, TransferOutcome};
pub use http::{HttpPartFetcher, HttpTransfer, PartFetcher};
pub use sidecar::{read_sidecar, write_sidecar, Sidecar, SIDECAR_FILE_NAME};
