//! Archive extraction.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};

const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Whether the file starts with a zip local file header.
pub fn is_zip(path: &Path) -> Result<bool> {
    let mut header = [0u8; 4];
    let mut file = File::open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) => Ok(header == ZIP_MAGIC),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Extract every entry of `archive` under `dest`.
///
/// Entries whose names would escape `dest` abort the extraction. Returns the
/// extracted file paths in archive order.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    let mut extracted = Vec::with_capacity(zip.len());

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            Error::Archive(format!(
                "Unsafe entry name '{}' in {}",
                entry.name(),
                archive.display()
            ))
        })?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        out.sync_all()?;
        extracted.push(out_path);
    }

    tracing::debug!(
        "Extracted {} files from {}",
        extracted.len(),
        archive.display()
    );

    Ok(extracted)
}
