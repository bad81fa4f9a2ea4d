//! Terminal prompts.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use console::style;

use crate::catalog::CatalogItem;
use crate::error::{Error, Result};
use crate::fs::expand_tilde;
use crate::prompt::contract::{Credentials, Prompt};

/// Prompts on stdin/stdout. Without a terminal every prompt resolves to
/// "no answer".
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    /// Never prompt, even on a terminal.
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Print `label` and read one trimmed line; empty input is `None`.
fn read_line(label: &str) -> Result<Option<String>> {
    print!("{} ", style(label).bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let input = input.trim();

    Ok(if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    })
}

fn read_credentials() -> Result<Option<Credentials>> {
    let Some(username) = read_line("Username:")? else {
        return Ok(None);
    };
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Ok(None);
    }

    Ok(Some(Credentials { username, password }))
}

/// Interpret a yes/no answer; anything but yes is no.
fn parse_confirmation(answer: Option<&str>) -> bool {
    matches!(
        answer.map(|a| a.to_lowercase()).as_deref(),
        Some("y") | Some("yes")
    )
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(io::Error::other(e)))?
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn request_credentials(&self) -> Result<Option<Credentials>> {
        if !self.interactive {
            tracing::debug!("Not a terminal, cannot prompt for credentials");
            return Ok(None);
        }

        blocking(read_credentials).await
    }

    async fn request_download_location(&self) -> Result<Option<PathBuf>> {
        if !self.interactive {
            tracing::debug!("Not a terminal, cannot prompt for a download directory");
            return Ok(None);
        }

        let answer = blocking(|| read_line("Download directory:")).await?;
        Ok(answer.map(|dir| expand_tilde(&dir)))
    }

    async fn request_overwrite_decision(&self, item: &CatalogItem) -> Result<bool> {
        if !self.interactive {
            tracing::debug!("Not a terminal, not overwriting {}", item.isbn);
            return Ok(false);
        }

        let label = format!(
            "'{}' ({}) was already downloaded. Download again? [y/N]",
            item.title, item.isbn
        );
        let answer = blocking(move || read_line(&label)).await?;
        Ok(parse_confirmation(answer.as_deref()))
    }
}
