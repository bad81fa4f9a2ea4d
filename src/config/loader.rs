//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::session::Session;
use crate::error::{Error, Result};
use crate::fs::atomic_write;

/// Default library service base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://libro.fm";

const CONFIG_FILE_NAME: &str = "config.toml";
const LEDGER_FILE_NAME: &str = "ledger.json";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: Session,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Sync options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base URL of the library service.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Replace already-downloaded books without asking.
    #[serde(default)]
    pub overwrite: bool,

    /// Keep the downloaded archives next to the extracted files.
    #[serde(default)]
    pub keep_archives: bool,

    /// Location of the download ledger.
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,

    /// Average pause between book downloads, in milliseconds.
    #[serde(default = "default_download_delay")]
    pub download_delay_ms: u64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            overwrite: false,
            keep_archives: false,
            ledger_path: None,
            download_delay_ms: default_download_delay(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_download_delay() -> u64 {
    500
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "audiobook-sync")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        atomic_write(path, content.as_bytes())?;
        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Platform default configuration file location.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Effective ledger location.
    pub fn ledger_path(&self) -> PathBuf {
        if let Some(path) = &self.options.ledger_path {
            return path.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(LEDGER_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LEDGER_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[session]
username = "reader@example.com"
download_directory = "/books"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.session.username.as_deref(),
            Some("reader@example.com")
        );
        assert_eq!(config.session.auth_token, None);
        assert_eq!(config.options.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.options.keep_archives);
    }

    #[test]
    fn test_save_round_trips_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.session.auth_token = Some("token".into());
        config.options.keep_archives = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.session.token(), Some("token"));
        assert!(loaded.options.keep_archives);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
        assert!(Config::load_or_default(&path).is_ok());
    }

    #[test]
    fn test_ledger_path_override() {
        let mut config = Config::default();
        config.options.ledger_path = Some(PathBuf::from("/state/ledger.json"));
        assert_eq!(config.ledger_path(), PathBuf::from("/state/ledger.json"));
    }
}
