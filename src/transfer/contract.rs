//! Transfer contract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::catalog::{CatalogItem, DownloadMetadata};
use crate::error::Result;

/// Where a finished transfer landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// `base_dir` joined with the requested relative path.
    pub final_path: PathBuf,

    /// Archives kept after extraction, when requested and produced.
    pub archive_paths: Option<Vec<PathBuf>>,
}

/// Fetches book parts and places them on disk.
///
/// Implementations must never leave a partial result visible at the final
/// path.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Download `urls` in order into `base_dir/relative_path`.
    async fn download_parts(
        &self,
        relative_path: &Path,
        urls: &[String],
        token: &str,
        keep_archives: bool,
        base_dir: &Path,
    ) -> Result<TransferOutcome>;

    /// Write the metadata sidecar next to the downloaded content.
    async fn save_metadata(
        &self,
        item: &CatalogItem,
        metadata: &DownloadMetadata,
        final_path: &Path,
    ) -> Result<()>;

    /// ISBN of the book already stored at `final_path`, if its sidecar says.
    async fn occupant(&self, final_path: &Path) -> Result<Option<String>>;
}
