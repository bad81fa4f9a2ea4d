//! Path component sanitizing.

use crate::error::{Error, Result};

/// Sanitize one path component (folder or file name) built from catalog data.
///
/// Separators and characters reserved on common filesystems are replaced with
/// underscores. Components that would navigate (`.` or `..`) or that are
/// empty after sanitizing are rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // Sanitize problematic characters (replace with underscore)
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Windows silently drops trailing dots and spaces
    let sanitized = sanitized.trim().trim_end_matches('.').trim_end().to_string();

    if sanitized.is_empty() {
        return Err(Error::InvalidFilename(format!(
            "Path component cannot be empty, whitespace-only or dots-only: '{}'",
            name
        )));
    }

    Ok(sanitized)
}
