//! JSON file ledger.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::fs::atomic_write;
use crate::ledger::record::DownloadRecord;
use crate::ledger::store::Ledger;

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    #[serde(default)]
    records: BTreeMap<String, DownloadRecord>,
}

/// Ledger persisted as a single JSON document.
///
/// Every put rewrites the whole file atomically and only updates the
/// in-memory view once the write is on disk.
#[derive(Debug)]
pub struct JsonLedger {
    path: PathBuf,
    records: RwLock<BTreeMap<String, DownloadRecord>>,
}

impl JsonLedger {
    /// Open the ledger at `path`, starting empty when the file is missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let file: LedgerFile = serde_json::from_str(&content)?;
                if file.version > LEDGER_VERSION {
                    return Err(Error::Config(format!(
                        "Ledger {} has unsupported version {}",
                        path.display(),
                        file.version
                    )));
                }
                file.records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No ledger at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Loaded {} ledger records", records.len());

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Ledger for JsonLedger {
    async fn has_record(&self, isbn: &str) -> Result<bool> {
        Ok(self.records.read().await.contains_key(isbn))
    }

    async fn get_record(&self, isbn: &str) -> Result<Option<DownloadRecord>> {
        Ok(self.records.read().await.get(isbn).cloned())
    }

    async fn put_record(&self, record: DownloadRecord) -> Result<()> {
        // Held across the write so concurrent puts serialize
        let mut records = self.records.write().await;

        let mut next = records.clone();
        let isbn = record.isbn().to_string();
        next.insert(isbn.clone(), record);

        let file = LedgerFile {
            version: LEDGER_VERSION,
            records: next,
        };
        let content = serde_json::to_vec_pretty(&file)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &content))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        *records = file.records;
        tracing::debug!("Recorded {} in ledger", isbn);
        Ok(())
    }

    async fn records(&self) -> Result<Vec<DownloadRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, CatalogSnapshot, DownloadMetadata};

    fn record(isbn: &str, title: &str) -> DownloadRecord {
        let item = CatalogItem::new(isbn, title, "A. Author");
        DownloadRecord::new(
            item,
            PathBuf::from(format!("/books/A. Author/{}", title)),
            DownloadMetadata::new(isbn, vec![format!("https://cdn.example/{}.zip", isbn)]),
            None,
        )
    }

    #[tokio::test]
    async fn test_put_is_durable_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let ledger = JsonLedger::open(&path).await.unwrap();
        ledger.put_record(record("1", "First")).await.unwrap();
        drop(ledger);

        let reopened = JsonLedger::open(&path).await.unwrap();
        assert!(reopened.has_record("1").await.unwrap());
        assert_eq!(
            reopened.get_record("1").await.unwrap().unwrap().item.title,
            "First"
        );
    }

    #[tokio::test]
    async fn test_put_replaces_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path().join("ledger.json"))
            .await
            .unwrap();

        ledger.put_record(record("1", "Old")).await.unwrap();
        ledger.put_record(record("1", "New")).await.unwrap();

        let records = ledger.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item.title, "New");
    }

    #[tokio::test]
    async fn test_diff_excludes_recorded_items() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path().join("ledger.json"))
            .await
            .unwrap();
        ledger.put_record(record("2", "Second")).await.unwrap();

        let snapshot: CatalogSnapshot = vec![
            CatalogItem::new("3", "Third", "A. Author"),
            CatalogItem::new("2", "Second", "A. Author"),
            CatalogItem::new("1", "First", "A. Author"),
        ]
        .into_iter()
        .collect();

        let missing: Vec<String> = ledger
            .diff(&snapshot)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.isbn)
            .collect();
        assert_eq!(missing, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path().join("none.json"))
            .await
            .unwrap();
        assert!(ledger.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonLedger::open(&path).await,
            Err(Error::Json(_))
        ));
    }
}
