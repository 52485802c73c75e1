//! Concurrent persistence of resolved asset URLs.
//!
//! A fixed-size worker pool (semaphore-bounded tokio tasks) downloads each
//! asset and writes it into the destination directory. A failure on one
//! asset is logged and counted; it never cancels sibling workers or
//! already-scheduled work. Completion order across workers is unspecified.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::http::HttpClient;

/// Minimum allowed pool size.
const MIN_POOL_SIZE: usize = 1;

/// Maximum allowed pool size.
const MAX_POOL_SIZE: usize = 64;

/// Default pool size: fully sequential.
pub const DEFAULT_POOL_SIZE: usize = 1;

/// Error constructing the download engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Pool size outside the valid range.
    #[error("invalid pool size {value}: must be between {MIN_POOL_SIZE} and {MAX_POOL_SIZE}")]
    InvalidPoolSize {
        /// The rejected value.
        value: usize,
    },
}

/// Counters for one persistence batch. Thread-safe for updates from
/// concurrent workers.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a zeroed stats tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assets written successfully.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of assets that failed to download or write.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Total assets processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Semaphore-bounded download worker pool.
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    pool_size: usize,
}

impl DownloadEngine {
    /// Creates an engine with the given worker-pool size.
    ///
    /// `pool_size` = 1 degenerates to fully sequential execution.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPoolSize`] outside 1..=64.
    pub fn new(pool_size: usize) -> Result<Self, EngineError> {
        if !(MIN_POOL_SIZE..=MAX_POOL_SIZE).contains(&pool_size) {
            return Err(EngineError::InvalidPoolSize { value: pool_size });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        })
    }

    /// Returns the configured pool size.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Downloads every locator into `dest_dir` across the worker pool.
    ///
    /// The observable output set (file names and bytes) is independent of
    /// the pool size; only completion order varies. Per-asset failures are
    /// logged and counted in the returned stats.
    #[instrument(skip(self, locators, client), fields(assets = locators.len(), dest_dir = %dest_dir.display()))]
    pub async fn persist(
        &self,
        locators: Vec<String>,
        client: &HttpClient,
        dest_dir: &Path,
    ) -> DownloadStats {
        let stats = Arc::new(DownloadStats::new());
        let mut handles = Vec::with_capacity(locators.len());

        info!(assets = locators.len(), pool = self.pool_size, "starting downloads");

        for locator in locators {
            // On a closed semaphore, count the asset as failed and move on.
            let Ok(permit) = self.semaphore.clone().acquire_owned().await else {
                warn!(url = %locator, "worker pool closed, skipping asset");
                stats.increment_failed();
                continue;
            };

            let client = client.clone();
            let stats = Arc::clone(&stats);
            let dest_dir = dest_dir.to_path_buf();

            handles.push(tokio::spawn(async move {
                let _permit = permit;

                match client.download_to_file(&locator, &dest_dir).await {
                    Ok(path) => {
                        info!(url = %locator, path = %path.display(), "saved");
                        stats.increment_completed();
                    }
                    Err(e) => {
                        warn!(url = %locator, error = %e, "download failed");
                        stats.increment_failed();
                    }
                }
            }));
        }

        debug!(tasks = handles.len(), "waiting for downloads");
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
            }
        }

        let completed = stats.completed();
        let failed = stats.failed();
        info!(completed, failed, total = completed + failed, "downloads complete");

        Arc::try_unwrap(stats).unwrap_or_else(|arc_stats| {
            // All tasks joined, so this branch should be unreachable; rebuild
            // from the atomic values rather than panic.
            let fresh = DownloadStats::new();
            fresh.completed.store(arc_stats.completed(), Ordering::SeqCst);
            fresh.failed.store(arc_stats.failed(), Ordering::SeqCst);
            fresh
        })
    }
}
