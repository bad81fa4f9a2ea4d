//! Error types for the audiobook-sync application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Session setup errors
    #[error("Missing credentials: a username and password are required to log in")]
    MissingCredentials,

    #[error("Missing download directory: one is required before syncing")]
    MissingDownloadDirectory,

    #[error("Not authenticated: log in before contacting the library")]
    NotAuthenticated,

    // Download errors
    #[error("Failed to resolve download metadata for {isbn}: {source}")]
    MetadataResolutionFailed {
        isbn: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Book {0} has no authors")]
    MissingAuthors(String),

    #[error("Download failed for {0}")]
    DownloadFailed(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Archive error: {0}")]
    Archive(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // File system errors
    #[error("Invalid path component: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from session setup rather than a transfer.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Error::MissingCredentials | Error::MissingDownloadDirectory | Error::NotAuthenticated
        )
    }

    /// Whether the service rejected the session token, directly or as the
    /// cause of a metadata lookup.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Error::Authentication(_) => true,
            Error::MetadataResolutionFailed { source, .. } => source.is_auth_failure(),
            _ => false,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_BOOKS_FAILED: i32 = 6;
}
