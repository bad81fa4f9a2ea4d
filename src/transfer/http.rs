//! HTTP transfer with staged placement.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::LibraryApi;
use crate::catalog::{CatalogItem, DownloadMetadata};
use crate::error::{Error, Result};
use crate::fs::{resolve_download_path, sanitize_path_component, staging_path};
use crate::output::create_download_bar;
use crate::transfer::archive::{extract_archive, is_zip};
use crate::transfer::contract::{Transfer, TransferOutcome};
use crate::transfer::sidecar::{read_sidecar, write_sidecar};

/// Minimum part size to show a progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Source of part bytes for [`HttpTransfer`].
#[async_trait]
pub trait PartFetcher: Send + Sync {
    /// Write the part at `url` to `output_path`, returning the byte count.
    async fn fetch(&self, url: &str, token: &str, output_path: &Path) -> Result<u64>;
}

/// Streams parts from the library service's CDN.
pub struct HttpPartFetcher {
    api: LibraryApi,
    show_progress: bool,
}

impl HttpPartFetcher {
    pub fn new(api: LibraryApi, show_progress: bool) -> Self {
        Self { api, show_progress }
    }
}

#[async_trait]
impl PartFetcher for HttpPartFetcher {
    async fn fetch(&self, url: &str, token: &str, output_path: &Path) -> Result<u64> {
        let response = self.api.download_part(url, token).await?;

        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let mut file = File::create(output_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Transfer(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;
        file.sync_all().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        if let Some(expected) = content_length {
            if downloaded != expected {
                return Err(Error::Transfer(format!(
                    "Truncated part: got {} of {} bytes",
                    downloaded, expected
                )));
            }
        }

        Ok(downloaded)
    }
}

/// Downloads parts into a hidden staging directory, extracts any archives,
/// then renames the staging directory onto the final path.
pub struct HttpTransfer {
    fetcher: Arc<dyn PartFetcher>,
}

impl HttpTransfer {
    pub fn new(api: LibraryApi, show_progress: bool) -> Self {
        Self::with_fetcher(Arc::new(HttpPartFetcher::new(api, show_progress)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn PartFetcher>) -> Self {
        Self { fetcher }
    }

    /// Download and unpack every part into `staging`.
    ///
    /// Returns the file names of the archives left in `staging`.
    async fn assemble(
        &self,
        staging: &Path,
        urls: &[String],
        token: &str,
        keep_archives: bool,
    ) -> Result<Vec<String>> {
        let mut used = HashSet::new();
        let mut kept = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            let name = part_file_name(index, url, &mut used);
            let part_path = staging.join(&name);

            tracing::info!("Downloading part {}/{}", index + 1, urls.len());
            let bytes = self.fetcher.fetch(url, token, &part_path).await?;
            tracing::debug!("Part {} complete: {} bytes", name, bytes);

            let archive = part_path.clone();
            let dest = staging.to_path_buf();
            let extracted = run_blocking(move || {
                if is_zip(&archive)? {
                    extract_archive(&archive, &dest).map(Some)
                } else {
                    Ok(None)
                }
            })
            .await?;

            match extracted {
                Some(files) => {
                    tracing::debug!("Unpacked {} files from {}", files.len(), name);
                    if keep_archives {
                        kept.push(name);
                    } else {
                        tokio::fs::remove_file(&part_path).await?;
                    }
                }
                None => tracing::debug!("Part {} is not an archive, keeping as-is", name),
            }
        }

        Ok(kept)
    }
}

/// Choose a unique file name for a part, preferring the URL's last segment.
fn part_file_name(index: usize, url: &str, used: &mut HashSet<String>) -> String {
    let from_url = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|s| !s.is_empty())
        .and_then(|s| sanitize_path_component(&s).ok());

    let name = match from_url {
        Some(name) if !used.contains(&name) => name,
        _ => format!("part-{:02}.zip", index + 1),
    };

    used.insert(name.clone());
    name
}

/// Move `staging` onto `final_path`, replacing any previous copy.
fn place(staging: &Path, final_path: &Path) -> Result<()> {
    if let Some(parent) = final_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !final_path.exists() {
        std::fs::rename(staging, final_path)?;
        return Ok(());
    }

    let backup = previous_path(final_path)?;
    std::fs::rename(final_path, &backup)?;

    if let Err(e) = std::fs::rename(staging, final_path) {
        // Put the previous copy back so the final path stays complete
        let _ = std::fs::rename(&backup, final_path);
        return Err(e.into());
    }

    if let Err(e) = std::fs::remove_dir_all(&backup) {
        tracing::warn!("Failed to remove previous copy {}: {}", backup.display(), e);
    }

    Ok(())
}

fn previous_path(final_path: &Path) -> Result<PathBuf> {
    let staging = staging_path(final_path)?;
    let name = staging
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Transfer("Invalid staging name".into()))?
        .replace(".partial-", ".previous-");
    Ok(staging.with_file_name(name))
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Transfer(format!("Blocking task failed: {}", e)))?
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn download_parts(
        &self,
        relative_path: &Path,
        urls: &[String],
        token: &str,
        keep_archives: bool,
        base_dir: &Path,
    ) -> Result<TransferOutcome> {
        if urls.is_empty() {
            return Err(Error::Transfer("No parts to download".into()));
        }

        let final_path = resolve_download_path(base_dir, relative_path)?;
        let staging = staging_path(&final_path)?;
        tokio::fs::create_dir_all(&staging).await?;

        let kept = match self.assemble(&staging, urls, token, keep_archives).await {
            Ok(kept) => kept,
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&staging).await;
                return Err(e);
            }
        };

        let from = staging.clone();
        let to = final_path.clone();
        if let Err(e) = run_blocking(move || place(&from, &to)).await {
            let _ = tokio::fs::remove_dir_all(&staging).await;
            return Err(e);
        }

        tracing::info!("Saved to {}", final_path.display());

        let archive_paths = if kept.is_empty() {
            None
        } else {
            Some(kept.iter().map(|name| final_path.join(name)).collect())
        };

        Ok(TransferOutcome {
            final_path,
            archive_paths,
        })
    }

    async fn save_metadata(
        &self,
        item: &CatalogItem,
        metadata: &DownloadMetadata,
        final_path: &Path,
    ) -> Result<()> {
        let item = item.clone();
        let metadata = metadata.clone();
        let dir = final_path.to_path_buf();
        run_blocking(move || write_sidecar(&item, &metadata, &dir)).await
    }

    async fn occupant(&self, final_path: &Path) -> Result<Option<String>> {
        let dir = final_path.to_path_buf();
        let sidecar = run_blocking(move || match read_sidecar(&dir) {
            Ok(sidecar) => Ok(Some(sidecar)),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await?;

        Ok(sidecar.map(|s| s.item.isbn))
    }
}
