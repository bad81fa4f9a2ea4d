//! Download records.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, DownloadMetadata};

/// A completed download.
///
/// Only written after the transfer succeeded, so its existence implies the
/// book is present at `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub item: CatalogItem,

    /// Final local directory of the book.
    pub path: PathBuf,

    pub metadata: DownloadMetadata,

    /// Archives kept after extraction. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_files: Option<Vec<PathBuf>>,

    pub downloaded_at: DateTime<Utc>,
}

impl DownloadRecord {
    pub fn new(
        item: CatalogItem,
        path: PathBuf,
        metadata: DownloadMetadata,
        zip_files: Option<Vec<PathBuf>>,
    ) -> Self {
        Self {
            item,
            path,
            metadata,
            zip_files: zip_files.filter(|files| !files.is_empty()),
            downloaded_at: Utc::now(),
        }
    }

    pub fn isbn(&self) -> &str {
        &self.item.isbn
    }
}
