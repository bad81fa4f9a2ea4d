//! API request and response type definitions.

use serde::{Deserialize, Serialize};

use crate::api::gateway::CatalogPage;
use crate::catalog::{CatalogItem, DownloadMetadata};

/// Password-grant token request body.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn password(username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: "password",
            username,
            password,
        }
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Library listing response.
#[derive(Debug, Deserialize)]
pub struct LibraryResponse {
    #[serde(default)]
    pub audiobooks: Vec<CatalogItem>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: u32,
}

impl From<LibraryResponse> for CatalogPage {
    fn from(response: LibraryResponse) -> Self {
        CatalogPage {
            items: response.audiobooks,
            total_pages: response.total_pages,
        }
    }
}

/// Download manifest for one book.
#[derive(Debug, Deserialize)]
pub struct DownloadManifest {
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub parts: Vec<ManifestPart>,
}

/// One downloadable part of a book.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestPart {
    pub url: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl DownloadManifest {
    /// Convert into download metadata, keeping part order.
    pub fn into_metadata(self, requested_isbn: &str) -> DownloadMetadata {
        if let Some(isbn) = &self.isbn {
            if isbn != requested_isbn {
                tracing::warn!(
                    "Manifest ISBN {} does not match requested {}",
                    isbn,
                    requested_isbn
                );
            }
        }

        DownloadMetadata::new(
            requested_isbn,
            self.parts.into_iter().map(|p| p.url).collect(),
        )
    }
}

/// Error body returned by the service on failures.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable description of the failure.
    pub fn describe(&self) -> Option<String> {
        self.error_description
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_library_page() {
        let json = r#"{
            "page": 1,
            "total_pages": 2,
            "audiobooks": [
                {"isbn": "9780000000001", "title": "First", "authors": ["A. Author"],
                 "series": "Saga", "series_num": 1, "publisher": "Ignored"},
                {"isbn": "9780000000002", "title": "Second", "authors": "B. Writer"}
            ]
        }"#;

        let page: CatalogPage = serde_json::from_str::<LibraryResponse>(json)
            .unwrap()
            .into();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].series_num.as_deref(), Some("1"));
        assert_eq!(page.items[1].authors, vec!["B. Writer"]);
    }

    #[test]
    fn test_manifest_keeps_part_order() {
        let json = r#"{"isbn": "9780000000001", "parts": [
            {"url": "https://cdn.example/part1.zip", "size_bytes": 10},
            {"url": "https://cdn.example/part2.zip"}
        ]}"#;

        let manifest: DownloadManifest = serde_json::from_str(json).unwrap();
        let metadata = manifest.into_metadata("9780000000001");
        assert_eq!(
            metadata.parts,
            vec![
                "https://cdn.example/part1.zip",
                "https://cdn.example/part2.zip"
            ]
        );
    }

    #[test]
    fn test_error_body_description() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": "invalid_grant", "error_description": "Bad password"}"#)
                .unwrap();
        assert_eq!(body.describe().as_deref(), Some("Bad password"));
    }
}
