//! Metadata sidecar files.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, DownloadMetadata};
use crate::error::Result;
use crate::fs::atomic_write;

/// File name of the sidecar inside a book's directory.
pub const SIDECAR_FILE_NAME: &str = "metadata.json";

/// Description of a downloaded book, stored alongside its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sidecar {
    pub item: CatalogItem,
    pub metadata: DownloadMetadata,
    pub saved_at: DateTime<Utc>,
}

/// Write the sidecar for `item` into `book_dir`.
pub fn write_sidecar(item: &CatalogItem, metadata: &DownloadMetadata, book_dir: &Path) -> Result<()> {
    let sidecar = Sidecar {
        item: item.clone(),
        metadata: metadata.clone(),
        saved_at: Utc::now(),
    };
    let content = serde_json::to_vec_pretty(&sidecar)?;
    atomic_write(&book_dir.join(SIDECAR_FILE_NAME), &content)
}

/// Read the sidecar from `book_dir`.
pub fn read_sidecar(book_dir: &Path) -> Result<Sidecar> {
    let content = std::fs::read_to_string(book_dir.join(SIDECAR_FILE_NAME))?;
    Ok(serde_json::from_str(&content)?)
}
