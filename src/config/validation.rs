//! Configuration validation logic.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.options.api_base_url)?;

    if let Some(dir) = config.session.download_directory() {
        if dir.is_file() {
            return Err(Error::ConfigValidation {
                field: "download_directory".to_string(),
                message: format!("'{}' is a file, not a directory", dir.display()),
            });
        }
    }

    if let Some(username) = config.session.username.as_deref() {
        if username.trim() != username {
            return Err(Error::ConfigValidation {
                field: "username".to_string(),
                message: "Username has leading or trailing whitespace".to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the library service base URL.
pub fn validate_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(Error::ConfigValidation {
            field: "api_base_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.cannot_be_a_base() {
        return Err(Error::ConfigValidation {
            field: "api_base_url".to_string(),
            message: format!("'{}' cannot be used as a base URL", base_url),
        });
    }

    Ok(url)
}

static ISBN_PATTERN: OnceLock<Regex> = OnceLock::new();

// ISBN-10 may end in X; ISBN-13 is all digits
fn isbn_pattern() -> Result<&'static Regex> {
    if let Some(pattern) = ISBN_PATTERN.get() {
        return Ok(pattern);
    }

    let pattern = Regex::new(r"^(\d{9}[\dX]|\d{13})$").map_err(|e| Error::ConfigValidation {
        field: "isbn".to_string(),
        message: e.to_string(),
    })?;
    Ok(ISBN_PATTERN.get_or_init(|| pattern))
}

/// Normalize an ISBN argument, accepting hyphens and spaces.
pub fn parse_isbn(input: &str) -> Result<String> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect::<String>()
        .to_uppercase();

    if isbn_pattern()?.is_match(&cleaned) {
        return Ok(cleaned);
    }

    Err(Error::ConfigValidation {
        field: "isbn".to_string(),
        message: format!(
            "Invalid ISBN: '{}'. Must be 10 or 13 characters (hyphens allowed).",
            input
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://libro.fm").is_err());
        assert!(validate_base_url("https://libro.fm").is_ok());
    }

    #[test]
    fn test_download_directory_must_not_be_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.session.download_directory = Some(PathBuf::from(file.path()));

        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_parse_isbn() {
        assert_eq!(parse_isbn("9780000000002").unwrap(), "9780000000002");
        assert_eq!(parse_isbn("978-0-00-000000-2").unwrap(), "9780000000002");
        assert_eq!(parse_isbn("012345678x").unwrap(), "012345678X");
    }

    #[test]
    fn test_parse_isbn_invalid() {
        assert!(parse_isbn("12345").is_err());
        assert!(parse_isbn("not-an-isbn").is_err());
    }

    #[test]
    fn test_isbn_pattern_compiled_once() {
        let first = isbn_pattern().unwrap();
        let second = isbn_pattern().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
