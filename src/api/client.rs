//! Library service HTTP client.

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use url::Url;

use crate::api::gateway::{CatalogGateway, CatalogPage, LoginResponse};
use crate::api::types::*;
use crate::catalog::DownloadMetadata;
use crate::config::validate_base_url;
use crate::error::{Error, Result};

const TOKEN_PATH: &str = "oauth/token";
const LIBRARY_PATH: &str = "api/v7/library";
const MANIFEST_PATH: &str = "api/v9/download-manifest";

const USER_AGENT: &str = concat!("audiobook-sync/", env!("CARGO_PKG_VERSION"));

/// Library API client.
///
/// Holds no session state; every authenticated call takes the token.
#[derive(Debug, Clone)]
pub struct LibraryApi {
    client: Client,
    base_url: Url,
}

impl LibraryApi {
    /// Create a new API client for the given service base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = validate_base_url(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Build an absolute endpoint URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Make an authenticated GET request.
    async fn get(&self, path: &str, token: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        check_status(response).await
    }

    /// Fetch one download part, streaming the body to the caller.
    pub async fn download_part(&self, url: &str, token: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            return Err(Error::Transfer(format!(
                "Failed to download part: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Map error statuses onto the crate's error taxonomy.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    // Check for rate limiting
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Err(Error::RateLimited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.describe())
        .unwrap_or(body);

    // Check for auth errors
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!("Auth error response: {}", detail);
        return Err(Error::Authentication(format!(
            "HTTP {}: {}",
            status,
            if detail.is_empty() {
                "Authentication failed"
            } else {
                detail.as_str()
            }
        )));
    }

    Err(Error::Api(format!("HTTP {}: {}", status, detail)))
}

#[async_trait]
impl CatalogGateway for LibraryApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint(TOKEN_PATH)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&TokenRequest::password(username, password))
            .send()
            .await?;
        let response = check_status(response).await?;

        let text = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Failed to parse token response: {}", e)))?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(LoginResponse { access_token }),
            _ => Err(Error::Authentication(
                token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "No access token in response".to_string()),
            )),
        }
    }

    async fn list_catalog_page(&self, token: &str, page: u32) -> Result<CatalogPage> {
        let response = self
            .get(LIBRARY_PATH, token, &[("page", page.to_string())])
            .await?;
        let text = response.text().await?;
        tracing::debug!("Library page {} response length: {} bytes", page, text.len());

        let library: LibraryResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse library page {}: {} - Response: {}",
                page,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })?;

        Ok(library.into())
    }

    async fn resolve_download_metadata(
        &self,
        token: &str,
        isbn: &str,
    ) -> Result<DownloadMetadata> {
        let response = self
            .get(MANIFEST_PATH, token, &[("isbn", isbn.to_string())])
            .await?;
        let text = response.text().await?;
        tracing::debug!("Download manifest response: {}", text);

        let manifest: DownloadManifest = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse download manifest: {} - Response: {}",
                e, text
            ))
        })?;

        if manifest.parts.is_empty() {
            return Err(Error::Api(format!("No download parts for {}", isbn)));
        }

        Ok(manifest.into_metadata(isbn))
    }
}
