//! Whole-library export: walk collections, dedup, dispatch downloads.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{FlickrApi, PhotoRef, PAGE_SIZE};
use crate::download::fetcher::fetch_and_save;
use crate::download::scheduler::Dispatcher;
use crate::download::state::{RunStats, RunSummary};
use crate::download::walker::{walk, PageRef};
use crate::error::Result;
use crate::fs::ensure_dir;
use crate::manifest::{Manifest, MANIFEST_FILE};

/// Knobs for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Target directory for photos and the manifest.
    pub directory: PathBuf,
    /// Photos requested per listing page.
    pub page_size: u64,
    /// Maximum concurrent downloads, 0 for unbounded.
    pub concurrency: usize,
}

impl ExportOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            page_size: PAGE_SIZE,
            concurrency: 0,
        }
    }
}

/// Export every photo of every collection the authenticated user owns.
///
/// Returns once all dispatched downloads have finished.
pub async fn export_library(api: Arc<FlickrApi>, options: &ExportOptions) -> Result<RunSummary> {
    ensure_dir(&options.directory)?;
    let manifest = Arc::new(Manifest::open(options.directory.join(MANIFEST_FILE))?);
    tracing::info!(
        "{} photos already downloaded according to {}",
        manifest.len(),
        manifest.path().display()
    );

    let user = api.test_login().await?;
    tracing::info!("Logged in as {} ({})", user.username.content, user.id);

    let stats = Arc::new(RunStats::default());
    let (collection_count, pages) = walk(&api, &user.id, options.page_size).await?;
    stats.add_collections(collection_count as u64);

    let mut dispatcher = Dispatcher::new(options.concurrency);

    for page in pages {
        let photos = match list_page(&api, &user.id, &page, options.page_size).await {
            Ok(photos) => photos,
            Err(e) if e.is_fatal() => {
                // A revoked token fails every later call too
                tracing::error!(
                    "Listing page {} of collection {} failed: {}",
                    page.page,
                    page.collection_id,
                    e
                );
                dispatcher.join().await;
                return Err(e);
            }
            Err(e) => {
                stats.increment_page_failed();
                tracing::warn!(
                    "Skipping page {} of collection {}: {}",
                    page.page,
                    page.collection_id,
                    e
                );
                continue;
            }
        };
        stats.increment_page();
        stats.add_listed(photos.len() as u64);

        for photo in photos {
            if !manifest.claim(&photo.id) {
                stats.increment_skipped();
                tracing::debug!("Photo {} already downloaded", photo.id);
                continue;
            }

            stats.increment_dispatched();
            dispatcher.submit(save_photo(
                Arc::clone(&api),
                options.directory.clone(),
                Arc::clone(&manifest),
                Arc::clone(&stats),
                photo,
            ));
        }

        tracing::info!(
            "Page {} of collection {} dispatched",
            page.page,
            page.collection_id
        );
    }

    tracing::info!(
        "Walk finished: {} download(s) dispatched, waiting for {}",
        dispatcher.submitted(),
        dispatcher.pending()
    );
    let dispatched = dispatcher.join().await;
    tracing::debug!(
        "Dispatch finished: {} succeeded, {} failed",
        dispatched.succeeded,
        dispatched.failed
    );

    let summary = stats.summary();
    tracing::info!(
        "Export complete: {} saved, {} failed, {} already downloaded",
        summary.saved,
        summary.failed,
        summary.skipped
    );

    Ok(summary)
}

async fn list_page(
    api: &FlickrApi,
    user_id: &str,
    page: &PageRef,
    page_size: u64,
) -> Result<Vec<PhotoRef>> {
    let listing = api
        .list_collection_page(&page.collection_id, user_id, page.page, page_size)
        .await?;
    tracing::debug!(
        "Collection {} page {}/{}: {} photo(s)",
        listing.id,
        listing.page,
        listing.pages,
        listing.photo.len()
    );
    Ok(listing.photo)
}

/// Fetch one photo and record it; failures are logged and stay local.
async fn save_photo(
    api: Arc<FlickrApi>,
    directory: PathBuf,
    manifest: Arc<Manifest>,
    stats: Arc<RunStats>,
    photo: PhotoRef,
) -> Result<()> {
    let result = async {
        fetch_and_save(&api, &directory, &photo).await?;
        manifest.record(&photo.id).await
    }
    .await;

    match result {
        Ok(()) => {
            stats.increment_saved();
            tracing::info!("Image {} was saved", photo.id);
            Ok(())
        }
        Err(e) => {
            manifest.release(&photo.id);
            stats.increment_failed();
            tracing::warn!("Skipping photo {}: {}", photo.id, e);
            Err(e)
        }
    }
}
