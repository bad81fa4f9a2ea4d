//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, SessionUpdate};

/// Audiobook library sync CLI.
#[derive(Parser, Debug)]
#[command(
    name = "audiobook-sync",
    version,
    about = "Download every audiobook in your library that is not on disk yet",
    long_about = "Logs in to the audiobook service, lists your library, and downloads \
                  every book that has not been downloaded before.\n\n\
                  Downloaded books are tracked in a ledger so repeated runs only fetch new purchases."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Account username (email).
    #[arg(short, long, env = "AUDIOBOOK_SYNC_USERNAME")]
    pub username: Option<String>,

    /// Account password.
    #[arg(short, long, env = "AUDIOBOOK_SYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Library service base URL.
    #[arg(long = "api-url", env = "AUDIOBOOK_SYNC_API_URL")]
    pub api_base_url: Option<String>,

    /// Path to the download ledger.
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Replace already downloaded books without asking.
    #[arg(long)]
    pub overwrite: bool,

    /// Keep downloaded archives next to the extracted files.
    #[arg(long)]
    pub keep_archives: bool,

    /// Only sync these ISBNs (already downloaded ones are offered again).
    #[arg(long = "isbn", num_args = 1..)]
    pub isbns: Vec<String>,

    /// List new books without downloading them.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the download ledger and exit.
    #[arg(long)]
    pub list: bool,

    /// Forget the saved auth token and exit.
    #[arg(long)]
    pub logout: bool,

    /// Never prompt; fail instead when input is needed.
    #[arg(long)]
    pub no_input: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Effective configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        // New credentials invalidate any saved token
        let username_changed = self
            .username
            .as_ref()
            .is_some_and(|u| config.session.username.as_ref() != Some(u));
        let password_changed = self
            .password
            .as_ref()
            .is_some_and(|p| config.session.password.as_ref() != Some(p));

        config.session.change(SessionUpdate {
            username: self.username.clone().map(Some),
            password: self.password.clone().map(Some),
            download_directory: self.download_directory.clone().map(Some),
            ..Default::default()
        });

        if username_changed || password_changed {
            config.session.logout();
        }

        if let Some(url) = &self.api_base_url {
            config.options.api_base_url = url.clone();
        }

        if let Some(ledger) = &self.ledger {
            config.options.ledger_path = Some(ledger.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.overwrite {
            config.options.overwrite = true;
        }

        if self.keep_archives {
            config.options.keep_archives = true;
        }
    }
}
