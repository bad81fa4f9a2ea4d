//! In-memory ledger.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::ledger::record::DownloadRecord;
use crate::ledger::store::Ledger;

/// Ledger that lives only for the process. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: RwLock<BTreeMap<String, DownloadRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with existing records.
    pub fn with_records<I: IntoIterator<Item = DownloadRecord>>(records: I) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.isbn().to_string(), r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn has_record(&self, isbn: &str) -> Result<bool> {
        Ok(self.records.read().await.contains_key(isbn))
    }

    async fn get_record(&self, isbn: &str) -> Result<Option<DownloadRecord>> {
        Ok(self.records.read().await.get(isbn).cloned())
    }

    async fn put_record(&self, record: DownloadRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.isbn().to_string(), record);
        Ok(())
    }

    async fn records(&self) -> Result<Vec<DownloadRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    use crate::catalog::{CatalogItem, CatalogSnapshot, DownloadMetadata};

    fn record_for(item: &CatalogItem) -> DownloadRecord {
        DownloadRecord::new(
            item.clone(),
            PathBuf::from("/books").join(&item.title),
            DownloadMetadata::new(&item.isbn, vec![]),
            None,
        )
    }

    #[tokio::test]
    async fn test_diff_matches_set_difference_for_every_subset() {
        let items: Vec<CatalogItem> = (0..5)
            .map(|i| CatalogItem::new(format!("isbn-{}", i), format!("Book {}", i), "Author"))
            .collect();
        let snapshot: CatalogSnapshot = items.iter().cloned().collect();

        // Every subset of the catalog as the recorded set, plus a stray record
        for mask in 0u32..(1 << items.len()) {
            let mut recorded: Vec<DownloadRecord> = items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, item)| record_for(item))
                .collect();
            recorded.push(record_for(&CatalogItem::new("stray", "Gone", "Author")));

            let known: HashSet<String> = recorded.iter().map(|r| r.isbn().to_string()).collect();
            let ledger = MemoryLedger::with_records(recorded);

            let diff = ledger.diff(&snapshot).await.unwrap();
            let expected: Vec<&CatalogItem> =
                items.iter().filter(|i| !known.contains(&i.isbn)).collect();

            assert_eq!(diff.iter().collect::<Vec<_>>(), expected, "mask {:05b}", mask);
        }
    }

    #[test]
    fn test_records_sorted_by_isbn() {
        let ledger = MemoryLedger::with_records(vec![
            record_for(&CatalogItem::new("b", "B", "Author")),
            record_for(&CatalogItem::new("a", "A", "Author")),
        ]);

        let records = tokio_test::block_on(ledger.records()).unwrap();
        let isbns: Vec<&str> = records.iter().map(|r| r.isbn()).collect();
        assert_eq!(isbns, vec!["a", "b"]);
    }
}
