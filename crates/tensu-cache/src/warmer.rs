//! Offline cache warmer.
//!
//! Enumerates every clip address, diffs against what the durable cache
//! already holds and downloads the rest in fixed-size batches. Progress goes
//! out on a per-run channel and is mirrored in a `watch` so late observers
//! can read the latest snapshot.
//!
//! # Design Principles
//!
//! - One run per warmer instance; later `warm()` calls return `None`
//! - Item failures are soft misses, retried only by a future run
//! - Only an unusable cache store ends a run in [`WarmupState::Error`]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::join_all;
use tensu_core::{
    AUDIO_CACHE_NAMESPACE, ClipAddress, ClipCache, ClipCacheStore, ClipFetcher, WarmupProgress,
    WarmupState, all_clip_addresses,
};
use tokio::sync::{mpsc, watch};

/// Maximum clips fetched concurrently.
pub const BATCH_SIZE: usize = 10;

/// Populates the clip cache ahead of use.
pub struct CacheWarmer {
    store: Arc<dyn ClipCacheStore>,
    fetcher: Arc<dyn ClipFetcher>,
    addresses: Vec<ClipAddress>,
    batch_size: usize,
    started: AtomicBool,
    latest: watch::Sender<WarmupProgress>,
}

impl CacheWarmer {
    /// Warmer over the full address space.
    pub fn new(store: Arc<dyn ClipCacheStore>, fetcher: Arc<dyn ClipFetcher>) -> Self {
        Self::with_addresses(store, fetcher, all_clip_addresses())
    }

    /// Warmer over an explicit address list.
    pub fn with_addresses(
        store: Arc<dyn ClipCacheStore>,
        fetcher: Arc<dyn ClipFetcher>,
        addresses: Vec<ClipAddress>,
    ) -> Self {
        let (latest, _) = watch::channel(WarmupProgress {
            total: addresses.len(),
            ..WarmupProgress::checking()
        });
        Self {
            store,
            fetcher,
            addresses,
            batch_size: BATCH_SIZE,
            started: AtomicBool::new(false),
            latest,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Start the run. Returns `None` if a run was already started by this
    /// warmer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn warm(self: &Arc<Self>) -> Option<mpsc::UnboundedReceiver<WarmupProgress>> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Cache warmup already started");
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run(&tx).await });
        Some(rx)
    }

    /// Most recent progress snapshot.
    pub fn latest(&self) -> WarmupProgress {
        *self.latest.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<WarmupProgress> {
        self.latest.subscribe()
    }

    fn emit(&self, tx: &mpsc::UnboundedSender<WarmupProgress>, progress: WarmupProgress) {
        self.latest.send_replace(progress);
        // The caller may have dropped the receiver; the watch still updates.
        let _ = tx.send(progress);
    }

    async fn run(&self, tx: &mpsc::UnboundedSender<WarmupProgress>) {
        let total = self.addresses.len();
        let mut progress = WarmupProgress {
            total,
            ..WarmupProgress::checking()
        };
        self.emit(tx, progress);

        let cache = match self.store.open(AUDIO_CACHE_NAMESPACE).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::error!(error = %e, "Clip cache unavailable, warmup aborted");
                self.emit(tx, progress.with_state(WarmupState::Error));
                return;
            }
        };
        let present = match cache.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "Could not list clip cache, warmup aborted");
                self.emit(tx, progress.with_state(WarmupState::Error));
                return;
            }
        };

        let missing: Vec<&ClipAddress> = self
            .addresses
            .iter()
            .filter(|a| !present.contains(a.as_str()))
            .collect();
        progress.cached = total - missing.len();

        if missing.is_empty() {
            tracing::info!(total, "Clip cache already complete");
            self.emit(tx, progress.with_state(WarmupState::Done));
            return;
        }

        tracing::info!(missing = missing.len(), total, "Warming clip cache");
        progress.state = WarmupState::Downloading;
        self.emit(tx, progress);

        let mut failed = 0_usize;
        for batch in missing.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|a| self.fetch_one(cache.as_ref(), a))).await;
            let stored = results.iter().filter(|ok| **ok).count();
            failed += batch.len() - stored;
            progress.cached += stored;
            self.emit(tx, progress);
        }

        if failed > 0 {
            tracing::warn!(failed, "Some clips could not be cached; next run will retry");
        }
        tracing::info!(cached = progress.cached, total, "Clip cache warmup done");
        self.emit(tx, progress.with_state(WarmupState::Done));
    }

    /// Fetch and store one clip. Counts only if both steps succeed.
    async fn fetch_one(&self, cache: &dyn ClipCache, address: &ClipAddress) -> bool {
        let bytes = match self.fetcher.fetch(address).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(%address, error = %e, "Clip fetch failed");
                return false;
            }
        };
        match cache.put(address.as_str(), &bytes).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%address, error = %e, "Clip cache write failed");
                false
            }
        }
    }
}
