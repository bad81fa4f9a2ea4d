//! Resolved download metadata.

use serde::{Deserialize, Serialize};

/// Transfer plan for one book: its identifier and ordered part URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadMetadata {
    pub isbn: String,

    /// Part URLs in download order.
    pub parts: Vec<String>,
}

impl DownloadMetadata {
    pub fn new(isbn: impl Into<String>, parts: Vec<String>) -> Self {
        Self {
            isbn: isbn.into(),
            parts,
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
