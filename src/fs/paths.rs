//! Path and directory management.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Join the download directory with a book's relative path.
pub fn resolve_download_path(base_dir: &Path, relative: &Path) -> Result<PathBuf> {
    if relative.is_absolute() {
        return Err(Error::InvalidFilename(format!(
            "Relative path expected: '{}'",
            relative.display()
        )));
    }

    Ok(base_dir.join(relative))
}

/// Hidden sibling of `final_path` used to assemble a download before it is
/// moved into place.
pub fn staging_path(final_path: &Path) -> Result<PathBuf> {
    let parent = final_path
        .parent()
        .ok_or_else(|| Error::Transfer("Final path has no parent directory".into()))?;
    let name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Transfer("Final path has no file name".into()))?;

    Ok(parent.join(format!(".{}.partial-{}", name, uuid::Uuid::new_v4())))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `contents` to `path` so readers see either the old or the new file.
///
/// The data is flushed to disk before the rename, and the rename is flushed
/// through the parent directory where the platform allows it.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&parent)?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidFilename(format!("No file name: '{}'", path.display())))?;
    let tmp = parent.join(format!(".{}.tmp-{}", name, uuid::Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
        return result;
    }

    #[cfg(unix)]
    if let Ok(dir) = File::open(&parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_download_path() {
        let path = resolve_download_path(Path::new("/books"), Path::new("A/B/C")).unwrap();
        assert_eq!(path, PathBuf::from("/books/A/B/C"));

        assert!(resolve_download_path(Path::new("/books"), Path::new("/etc")).is_err());
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let staging = staging_path(Path::new("/books/A/The Book")).unwrap();
        assert_eq!(staging.parent(), Some(Path::new("/books/A")));

        let name = staging.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".The Book.partial-"));
    }

    #[test]
    fn test_atomic_write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
    }
}
