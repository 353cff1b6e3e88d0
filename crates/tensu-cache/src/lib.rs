//! Offline clip cache for tensu: a filesystem [`ClipCacheStore`], an HTTP
//! [`ClipFetcher`] and the [`CacheWarmer`] that fills one from the other.
//!
//! [`ClipCacheStore`]: tensu_core::ClipCacheStore
//! [`ClipFetcher`]: tensu_core::ClipFetcher
#![deny(unused_crate_dependencies)]

pub mod fetcher;
pub mod store;
pub mod warmer;

pub use fetcher::{DEFAULT_BASE_URL, HttpClipFetcher};
pub use store::{FsClipCache, FsClipCacheStore};
pub use warmer::{BATCH_SIZE, CacheWarmer};

// Silence unused dev-dependency warnings; mocks are used in tests/
#[cfg(test)]
use mockall as _;
