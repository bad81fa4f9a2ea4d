//! Fake collaborators for engine tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::{CatalogGateway, CatalogPage, LoginResponse};
use crate::catalog::{CatalogItem, DownloadMetadata};
use crate::config::Session;
use crate::error::{Error, Result};
use crate::ledger::{Ledger, MemoryLedger};
use crate::prompt::{Credentials, Prompt};
use crate::sync::SyncEngine;
use crate::transfer::{Transfer, TransferOutcome};

pub(crate) fn book(isbn: &str, title: &str) -> CatalogItem {
    CatalogItem::new(isbn, title, "A. Author")
}

pub(crate) fn logged_in_session() -> Session {
    Session {
        username: Some("reader@example.com".into()),
        password: Some("secret".into()),
        auth_token: Some("token-1".into()),
        download_directory: Some(PathBuf::from("/books")),
    }
}

/// Gateway serving canned pages; failing pages hold an error message.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub pages: HashMap<u32, std::result::Result<CatalogPage, String>>,
    pub login_result: Option<std::result::Result<String, String>>,
    pub failing_metadata: Vec<String>,
    pub expired_metadata: Vec<String>,
    pub page_requests: Mutex<Vec<u32>>,
    pub logins: Mutex<Vec<(String, String)>>,
    pub metadata_requests: Mutex<Vec<String>>,
}

impl FakeGateway {
    /// Gateway listing `items` as one page per inner vector.
    pub fn with_pages(pages: Vec<Vec<CatalogItem>>) -> Self {
        let total_pages = pages.len() as u32;
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, items)| (i as u32 + 1, Ok(CatalogPage { items, total_pages })))
            .collect();
        Self {
            pages,
            login_result: Some(Ok("token-new".to_string())),
            ..Default::default()
        }
    }

    pub async fn page_requests(&self) -> Vec<u32> {
        self.page_requests.lock().await.clone()
    }

    pub async fn login_count(&self) -> usize {
        self.logins.lock().await.len()
    }

    pub async fn metadata_count(&self) -> usize {
        self.metadata_requests.lock().await.len()
    }
}

#[async_trait]
impl CatalogGateway for FakeGateway {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.logins
            .lock()
            .await
            .push((username.to_string(), password.to_string()));

        match &self.login_result {
            Some(Ok(token)) => Ok(LoginResponse {
                access_token: token.clone(),
            }),
            Some(Err(message)) => Err(Error::Authentication(message.clone())),
            None => Err(Error::Api("login not configured".into())),
        }
    }

    async fn list_catalog_page(&self, _token: &str, page: u32) -> Result<CatalogPage> {
        self.page_requests.lock().await.push(page);

        match self.pages.get(&page) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(Error::Api(message.clone())),
            None => Err(Error::Api(format!("no page {}", page))),
        }
    }

    async fn resolve_download_metadata(
        &self,
        _token: &str,
        isbn: &str,
    ) -> Result<DownloadMetadata> {
        self.metadata_requests.lock().await.push(isbn.to_string());

        if self.failing_metadata.iter().any(|i| i == isbn) {
            return Err(Error::Api("HTTP 404: unknown isbn".into()));
        }
        if self.expired_metadata.iter().any(|i| i == isbn) {
            return Err(Error::Authentication("HTTP 401: token expired".into()));
        }

        Ok(DownloadMetadata::new(
            isbn,
            vec![
                format!("https://cdn.example/{}/part1.zip", isbn),
                format!("https://cdn.example/{}/part2.zip", isbn),
            ],
        ))
    }
}

/// One recorded transfer call.
#[derive(Debug, Clone)]
pub(crate) struct TransferCall {
    pub relative_path: PathBuf,
    pub urls: Vec<String>,
    pub token: String,
    pub keep_archives: bool,
}

/// Transfer that records calls instead of touching the network.
#[derive(Default)]
pub(crate) struct FakeTransfer {
    pub fail: bool,
    pub fail_metadata: bool,
    /// Books already on disk, by final path.
    pub occupants: HashMap<PathBuf, String>,
    pub calls: Mutex<Vec<TransferCall>>,
    pub saved_metadata: Mutex<Vec<String>>,
}

impl FakeTransfer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl Transfer for FakeTransfer {
    async fn download_parts(
        &self,
        relative_path: &Path,
        urls: &[String],
        token: &str,
        keep_archives: bool,
        base_dir: &Path,
    ) -> Result<TransferOutcome> {
        self.calls.lock().await.push(TransferCall {
            relative_path: relative_path.to_path_buf(),
            urls: urls.to_vec(),
            token: token.to_string(),
            keep_archives,
        });

        if self.fail {
            return Err(Error::Transfer("connection reset".into()));
        }

        let final_path = base_dir.join(relative_path);
        let archive_paths = keep_archives.then(|| vec![final_path.join("part1.zip")]);
        Ok(TransferOutcome {
            final_path,
            archive_paths,
        })
    }

    async fn save_metadata(
        &self,
        item: &CatalogItem,
        _metadata: &DownloadMetadata,
        _final_path: &Path,
    ) -> Result<()> {
        if self.fail_metadata {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        self.saved_metadata.lock().await.push(item.isbn.clone());
        Ok(())
    }

    async fn occupant(&self, final_path: &Path) -> Result<Option<String>> {
        Ok(self.occupants.get(final_path).cloned())
    }
}

/// Prompt with fixed answers that counts how often it was asked.
#[derive(Default)]
pub(crate) struct FakePrompt {
    pub credentials: Option<Credentials>,
    pub directory: Option<PathBuf>,
    pub overwrite: bool,
    pub credential_requests: Mutex<usize>,
    pub directory_requests: Mutex<usize>,
    pub overwrite_requests: Mutex<Vec<String>>,
}

impl FakePrompt {
    pub fn answering_overwrite(overwrite: bool) -> Self {
        Self {
            overwrite,
            ..Default::default()
        }
    }

    pub async fn overwrite_count(&self) -> usize {
        self.overwrite_requests.lock().await.len()
    }
}

#[async_trait]
impl Prompt for FakePrompt {
    async fn request_credentials(&self) -> Result<Option<Credentials>> {
        *self.credential_requests.lock().await += 1;
        Ok(self.credentials.clone())
    }

    async fn request_download_location(&self) -> Result<Option<PathBuf>> {
        *self.directory_requests.lock().await += 1;
        Ok(self.directory.clone())
    }

    async fn request_overwrite_decision(&self, item: &CatalogItem) -> Result<bool> {
        self.overwrite_requests.lock().await.push(item.isbn.clone());
        Ok(self.overwrite)
    }
}

/// Engine wired to fakes, with handles kept for assertions.
pub(crate) struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub ledger: Arc<MemoryLedger>,
    pub transfer: Arc<FakeTransfer>,
    pub prompt: Arc<FakePrompt>,
    pub engine: SyncEngine,
}

impl Harness {
    pub fn new(gateway: FakeGateway, transfer: FakeTransfer, prompt: FakePrompt) -> Self {
        Self::with_ledger(gateway, MemoryLedger::new(), transfer, prompt)
    }

    pub fn with_ledger(
        gateway: FakeGateway,
        ledger: MemoryLedger,
        transfer: FakeTransfer,
        prompt: FakePrompt,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let ledger = Arc::new(ledger);
        let transfer = Arc::new(transfer);
        let prompt = Arc::new(prompt);

        let engine = SyncEngine::new(
            gateway.clone(),
            ledger.clone(),
            transfer.clone(),
            prompt.clone(),
        );

        Self {
            gateway,
            ledger,
            transfer,
            prompt,
            engine,
        }
    }

    pub async fn recorded_isbns(&self) -> Vec<String> {
        self.ledger
            .records()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.item.isbn)
            .collect()
    }
}
