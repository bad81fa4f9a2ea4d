//! Ledger contract.

use async_trait::async_trait;

use crate::catalog::{CatalogItem, CatalogSnapshot};
use crate::error::Result;
use crate::ledger::record::DownloadRecord;

/// Durable record of completed downloads, keyed by ISBN.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn has_record(&self, isbn: &str) -> Result<bool>;

    async fn get_record(&self, isbn: &str) -> Result<Option<DownloadRecord>>;

    /// Insert or replace the record for its ISBN.
    ///
    /// The record must be durable when this returns.
    async fn put_record(&self, record: DownloadRecord) -> Result<()>;

    /// All records, ordered by ISBN.
    async fn records(&self) -> Result<Vec<DownloadRecord>>;

    /// Snapshot items with no record, in snapshot order.
    async fn diff(&self, snapshot: &CatalogSnapshot) -> Result<Vec<CatalogItem>> {
        let mut missing = Vec::new();
        for item in snapshot.iter() {
            if !self.has_record(&item.isbn).await? {
                missing.push(item.clone());
            }
        }
        Ok(missing)
    }
}
