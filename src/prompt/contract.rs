//! Prompt contract.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::catalog::CatalogItem;
use crate::error::Result;

/// Username and password supplied by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decisions and values only a human (or a script) can provide.
///
/// Each call waits for an answer; `None` means none was given.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn request_credentials(&self) -> Result<Option<Credentials>>;

    async fn request_download_location(&self) -> Result<Option<PathBuf>>;

    /// Whether to replace an already downloaded copy of `item`.
    async fn request_overwrite_decision(&self, item: &CatalogItem) -> Result<bool>;
}
