//! Whole-library sync pass.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::catalog::CatalogItem;
use crate::config::Session;
use crate::error::Result;
use crate::sync::engine::SyncEngine;
use crate::sync::state::RunStats;

/// Options for one sync pass.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Replace recorded books without asking.
    pub overwrite: bool,

    pub keep_archives: bool,

    /// Only report what would be downloaded.
    pub dry_run: bool,

    /// Restrict the pass to these ISBNs, including already recorded ones.
    pub only_isbns: Vec<String>,

    /// Average pause between book downloads.
    pub download_delay: Duration,
}

/// Run session setup, catalog diffing and every download.
///
/// Setup errors abort the pass. Each book is isolated: its failure is
/// counted and the pass moves on to the next one.
pub async fn sync_library(
    engine: &SyncEngine,
    session: &mut Session,
    options: &SyncOptions,
) -> Result<(RunStats, Vec<CatalogItem>)> {
    let mut stats = RunStats::default();

    engine.initialize_session(session).await?;

    let items = select_items(engine, session, options).await?;
    stats.new_items = items.len() as u64;

    if !session.is_authenticated() {
        stats.catalog_incomplete = true;
        tracing::warn!(
            "Catalog listing was interrupted; the session was logged out and {} books \
             will be picked up after the next login",
            items.len()
        );
        return Ok((stats, items));
    }

    if options.dry_run || items.is_empty() {
        return Ok((stats, items));
    }

    let total = items.len();
    for (index, item) in items.iter().enumerate() {
        if index > 0 && !options.download_delay.is_zero() {
            sleep(jitter(options.download_delay)).await;
        }

        tracing::info!("[{}/{}] {}", index + 1, total, item.title);

        match engine
            .download_item(session, item, options.overwrite, options.keep_archives)
            .await
        {
            Ok(Some(record)) => {
                tracing::info!("Downloaded '{}' to {}", item.title, record.path.display());
                stats.mark_downloaded();
            }
            Ok(None) => stats.mark_skipped(),
            Err(e) => {
                tracing::error!("Failed to download '{}': {}", item.title, e);
                stats.mark_failed(&item.isbn);

                if e.is_auth_failure() {
                    tracing::warn!(
                        "Token rejected, logging out; {} books left for the next run",
                        total - index - 1
                    );
                    session.logout();
                    stats.session_expired = true;
                    break;
                }
            }
        }
    }

    Ok((stats, items))
}

/// New items, or the requested ISBNs from the full catalog.
async fn select_items(
    engine: &SyncEngine,
    session: &mut Session,
    options: &SyncOptions,
) -> Result<Vec<CatalogItem>> {
    if options.only_isbns.is_empty() {
        return engine.find_new_items(session).await;
    }

    let snapshot = engine.fetch_full_catalog(session).await?;
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for isbn in &options.only_isbns {
        if !seen.insert(isbn.as_str()) {
            continue;
        }
        match snapshot.get(isbn) {
            Some(item) => selected.push(item.clone()),
            None => tracing::warn!("{} is not in the library", isbn),
        }
    }

    Ok(selected)
}

/// Randomize a delay to between 80% and 150% of `base`.
fn jitter(base: Duration) -> Duration {
    let millis = base.as_millis() as u64;
    let low = millis * 4 / 5;
    let high = (millis * 3 / 2).max(low + 1);
    Duration::from_millis(rand::thread_rng().gen_range(low..high))
}
