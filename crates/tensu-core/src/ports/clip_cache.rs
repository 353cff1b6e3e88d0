//! Durable clip cache port.
//!
//! Entries are write-once and never invalidated: a changed clip needs a new
//! address or a new namespace. The warmer is the only writer; the playback
//! engine only reads, so implementations need no cross-entry locking.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Namespace holding clip payloads.
pub const AUDIO_CACHE_NAMESPACE: &str = "audio-cache";

/// Errors from the cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not be opened at all.
    #[error("Failed to open cache '{namespace}': {reason}")]
    Open { namespace: String, reason: String },

    /// The key cannot be mapped to a storage location.
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Cache I/O error: {0}")]
    Io(String),
}

/// An opened cache namespace.
#[async_trait]
pub trait ClipCache: Send + Sync {
    /// All keys currently present.
    async fn keys(&self) -> Result<HashSet<String>, CacheError>;

    /// Bytes stored under `key`, if present.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store bytes under `key`.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError>;
}

/// Opens cache namespaces.
#[async_trait]
pub trait ClipCacheStore: Send + Sync {
    async fn open(&self, namespace: &str) -> Result<Arc<dyn ClipCache>, CacheError>;
}
