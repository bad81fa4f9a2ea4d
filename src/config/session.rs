//! Credential and session state.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Live credentials and download location for one client.
///
/// Only one auth token is valid at a time; an absent token means logged out.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_directory: Option<PathBuf>,
}

/// Partial session change.
///
/// `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub username: Option<Option<String>>,
    pub password: Option<Option<String>>,
    pub auth_token: Option<Option<String>>,
    pub download_directory: Option<Option<PathBuf>>,
}

impl SessionUpdate {
    pub fn credentials(username: String, password: String) -> Self {
        Self {
            username: Some(Some(username)),
            password: Some(Some(password)),
            ..Default::default()
        }
    }

    pub fn auth_token(token: Option<String>) -> Self {
        Self {
            auth_token: Some(token),
            ..Default::default()
        }
    }

    pub fn download_directory(dir: Option<PathBuf>) -> Self {
        Self {
            download_directory: Some(dir),
            ..Default::default()
        }
    }
}

impl Session {
    /// Merge the given fields, leaving the others untouched.
    pub fn change(&mut self, update: SessionUpdate) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(token) = update.auth_token {
            self.auth_token = token;
        }
        if let Some(dir) = update.download_directory {
            self.download_directory = dir;
        }
    }

    /// Drop the auth token, forcing a fresh login next time.
    pub fn logout(&mut self) {
        self.change(SessionUpdate::auth_token(None));
    }

    /// The auth token, if one is present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Username and password when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }

    pub fn download_directory(&self) -> Option<&PathBuf> {
        self.download_directory
            .as_ref()
            .filter(|d| !d.as_os_str().is_empty())
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "<redacted>",
        None => "<none>",
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("auth_token", &redact(&self.auth_token))
            .field("download_directory", &self.download_directory)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> Session {
        Session {
            username: Some("reader@example.com".into()),
            password: Some("hunter2".into()),
            auth_token: Some("token-1".into()),
            download_directory: Some(PathBuf::from("/books")),
        }
    }

    #[test]
    fn test_change_leaves_other_fields() {
        let mut session = logged_in();
        session.change(SessionUpdate::auth_token(Some("token-2".into())));

        assert_eq!(session.token(), Some("token-2"));
        assert_eq!(session.username.as_deref(), Some("reader@example.com"));
        assert_eq!(session.download_directory(), Some(&PathBuf::from("/books")));
    }

    #[test]
    fn test_explicit_absent_token_logs_out() {
        let mut session = logged_in();
        session.change(SessionUpdate::auth_token(None));

        assert!(!session.is_authenticated());
        assert!(session.credentials().is_some());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let session = Session {
            username: Some(String::new()),
            password: Some("pw".into()),
            auth_token: Some(String::new()),
            download_directory: Some(PathBuf::new()),
        };

        assert!(session.credentials().is_none());
        assert!(!session.is_authenticated());
        assert!(session.download_directory().is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", logged_in());
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("token-1"));
        assert!(debug.contains("reader@example.com"));
    }
}
