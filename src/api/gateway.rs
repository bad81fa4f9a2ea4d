//! Catalog gateway contract.

use async_trait::async_trait;

use crate::catalog::{CatalogItem, DownloadMetadata};
use crate::error::Result;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
}

/// One page of the remote catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,

    /// Total number of pages reported by the service.
    pub total_pages: u32,
}

/// Authenticated remote calls against the library service.
///
/// Implementations may retry internally; callers never retry.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Exchange a username and password for an access token.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;

    /// Fetch one page (1-based) of the user's catalog.
    async fn list_catalog_page(&self, token: &str, page: u32) -> Result<CatalogPage>;

    /// Resolve the ordered part URLs for one book.
    async fn resolve_download_metadata(&self, token: &str, isbn: &str)
        -> Result<DownloadMetadata>;
}
