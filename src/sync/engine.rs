//! Sync engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::CatalogGateway;
use crate::catalog::{CatalogItem, CatalogSnapshot, DownloadMetadata};
use crate::config::{Session, SessionUpdate};
use crate::error::{Error, Result};
use crate::fs::resolve_download_path;
use crate::ledger::{DownloadRecord, Ledger};
use crate::prompt::Prompt;
use crate::sync::logged::logged;
use crate::transfer::Transfer;

/// Coordinates the gateway, ledger, transfer and prompt collaborators.
///
/// The engine holds no session state of its own; callers pass the session
/// into each operation.
pub struct SyncEngine {
    gateway: Arc<dyn CatalogGateway>,
    ledger: Arc<dyn Ledger>,
    transfer: Arc<dyn Transfer>,
    prompt: Arc<dyn Prompt>,
}

impl SyncEngine {
    pub fn new(
        gateway: Arc<dyn CatalogGateway>,
        ledger: Arc<dyn Ledger>,
        transfer: Arc<dyn Transfer>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            transfer,
            prompt,
        }
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Make sure the session has a token and a download directory.
    ///
    /// Missing values are requested through the prompt. A session that
    /// already has both is left untouched.
    pub async fn initialize_session(&self, session: &mut Session) -> Result<()> {
        logged("initialize_session", self.ensure_session(session)).await
    }

    /// Log in and store the new token, replacing any previous one.
    pub async fn login(&self, session: &mut Session, username: &str, password: &str) -> Result<()> {
        logged("login", self.authenticate(session, username, password)).await
    }

    /// Page through the whole remote catalog.
    ///
    /// A failing page stops the listing, logs the session out and returns the
    /// items gathered so far, so the snapshot may be incomplete.
    pub async fn fetch_full_catalog(&self, session: &mut Session) -> Result<CatalogSnapshot> {
        logged("fetch_full_catalog", self.collect_pages(session)).await
    }

    /// Catalog items with no ledger record, in discovery order.
    pub async fn find_new_items(&self, session: &mut Session) -> Result<Vec<CatalogItem>> {
        logged("find_new_items", self.diff_catalog(session)).await
    }

    /// Download one book and record it.
    ///
    /// Returns `None` when the book was already downloaded and the user
    /// declined to replace it. Metadata resolution failures propagate as
    /// [`Error::MetadataResolutionFailed`]; every other failure is logged and
    /// reported as [`Error::DownloadFailed`].
    pub async fn download_item(
        &self,
        session: &Session,
        item: &CatalogItem,
        overwrite: bool,
        keep_archives: bool,
    ) -> Result<Option<DownloadRecord>> {
        logged(
            "download_item",
            self.download(session, item, overwrite, keep_archives),
        )
        .await
    }

    async fn ensure_session(&self, session: &mut Session) -> Result<()> {
        if !session.is_authenticated() {
            if session.credentials().is_none() {
                if let Some(credentials) = self.prompt.request_credentials().await? {
                    session.change(SessionUpdate::credentials(
                        credentials.username,
                        credentials.password,
                    ));
                }
            }

            let (username, password) = session
                .credentials()
                .map(|(u, p)| (u.to_string(), p.to_string()))
                .ok_or(Error::MissingCredentials)?;

            self.login(session, &username, &password).await?;
        }

        if session.download_directory().is_none() {
            if let Some(dir) = self.prompt.request_download_location().await? {
                session.change(SessionUpdate::download_directory(Some(dir)));
            }

            if session.download_directory().is_none() {
                return Err(Error::MissingDownloadDirectory);
            }
        }

        Ok(())
    }

    async fn authenticate(&self, session: &mut Session, username: &str, password: &str) -> Result<()> {
        let response = self.gateway.login(username, password).await?;
        session.change(SessionUpdate::auth_token(Some(response.access_token)));
        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    async fn collect_pages(&self, session: &mut Session) -> Result<CatalogSnapshot> {
        let token = session.token().ok_or(Error::NotAuthenticated)?.to_string();

        let mut snapshot = CatalogSnapshot::new();
        let mut page = 1;

        loop {
            match self.gateway.list_catalog_page(&token, page).await {
                Ok(result) => {
                    tracing::debug!(
                        "Catalog page {}/{}: {} items",
                        page,
                        result.total_pages,
                        result.items.len()
                    );
                    snapshot.merge_page(result.items);

                    if page >= result.total_pages {
                        break;
                    }
                    page += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        page,
                        error = %e,
                        "Catalog listing failed, logging out; {} items gathered",
                        snapshot.len()
                    );
                    session.logout();
                    break;
                }
            }
        }

        tracing::info!("Catalog contains {} books", snapshot.len());
        Ok(snapshot)
    }

    async fn diff_catalog(&self, session: &mut Session) -> Result<Vec<CatalogItem>> {
        let snapshot = self.fetch_full_catalog(session).await?;
        let new_items = self.ledger.diff(&snapshot).await?;
        tracing::info!("{} new books", new_items.len());
        Ok(new_items)
    }

    async fn download(
        &self,
        session: &Session,
        item: &CatalogItem,
        overwrite: bool,
        keep_archives: bool,
    ) -> Result<Option<DownloadRecord>> {
        let token = session.token().ok_or(Error::NotAuthenticated)?;

        // Checked before any network work
        let relative_path = item
            .relative_path()
            .map_err(|e| download_failed(item, e))?;

        let metadata = self
            .gateway
            .resolve_download_metadata(token, &item.isbn)
            .await
            .map_err(|e| Error::MetadataResolutionFailed {
                isbn: item.isbn.clone(),
                source: Box::new(e),
            })?;

        self.transfer_and_record(
            session,
            token,
            item,
            &relative_path,
            metadata,
            overwrite,
            keep_archives,
        )
        .await
        .map_err(|e| download_failed(item, e))
    }

    #[allow(clippy::too_many_arguments)]
    async fn transfer_and_record(
        &self,
        session: &Session,
        token: &str,
        item: &CatalogItem,
        relative_path: &Path,
        metadata: DownloadMetadata,
        overwrite: bool,
        keep_archives: bool,
    ) -> Result<Option<DownloadRecord>> {
        let base_dir = session
            .download_directory()
            .ok_or(Error::MissingDownloadDirectory)?;

        if !overwrite
            && self.ledger.has_record(&item.isbn).await?
            && !self.prompt.request_overwrite_decision(item).await?
        {
            tracing::info!("Keeping existing copy of {}", item.title);
            return Ok(None);
        }

        let relative_path = self.claim_path(base_dir, item, relative_path).await?;

        tracing::info!(
            "Downloading '{}' ({} parts) to {}",
            item.title,
            metadata.part_count(),
            relative_path.display()
        );

        let outcome = self
            .transfer
            .download_parts(&relative_path, &metadata.parts, token, keep_archives, base_dir)
            .await?;

        self.transfer
            .save_metadata(item, &metadata, &outcome.final_path)
            .await?;

        let record = DownloadRecord::new(
            item.clone(),
            outcome.final_path,
            metadata,
            outcome.archive_paths,
        );
        self.ledger.put_record(record.clone()).await?;

        Ok(Some(record))
    }

    /// Pick a path no other book owns, falling back to the ISBN-suffixed
    /// variant when another edition already lives at the usual one.
    async fn claim_path(
        &self,
        base_dir: &Path,
        item: &CatalogItem,
        relative_path: &Path,
    ) -> Result<PathBuf> {
        if !self.owned_by_other(base_dir, item, relative_path).await? {
            return Ok(relative_path.to_path_buf());
        }

        let alternate = item.disambiguated_relative_path()?;
        if self.owned_by_other(base_dir, item, &alternate).await? {
            return Err(Error::Transfer(format!(
                "{} and {} both belong to other books",
                relative_path.display(),
                alternate.display()
            )));
        }

        tracing::warn!(
            isbn = %item.isbn,
            "{} holds another edition, using {}",
            relative_path.display(),
            alternate.display()
        );
        Ok(alternate)
    }

    async fn owned_by_other(
        &self,
        base_dir: &Path,
        item: &CatalogItem,
        relative_path: &Path,
    ) -> Result<bool> {
        let final_path = resolve_download_path(base_dir, relative_path)?;

        if let Some(isbn) = self.transfer.occupant(&final_path).await? {
            if isbn != item.isbn {
                return Ok(true);
            }
        }

        Ok(self
            .ledger
            .records()
            .await?
            .iter()
            .any(|r| r.path == final_path && r.isbn() != item.isbn))
    }
}

/// Log the real cause and collapse it into [`Error::DownloadFailed`].
fn download_failed(item: &CatalogItem, cause: Error) -> Error {
    tracing::error!(isbn = %item.isbn, title = %item.title, error = %cause, "Download failed");
    Error::DownloadFailed(item.isbn.clone())
}
