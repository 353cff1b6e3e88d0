//! Network fetch port for clip payloads.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ClipAddress;

/// Errors from fetching a clip.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connection reset, offline).
    #[error("Network error fetching {address}: {reason}")]
    Network { address: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {address}")]
    Status { address: String, status: u16 },

    /// The address could not be turned into a request URL.
    #[error("Invalid clip address: {0}")]
    InvalidAddress(String),
}

/// Fetches clip bytes by address.
#[async_trait]
pub trait ClipFetcher: Send + Sync {
    async fn fetch(&self, address: &ClipAddress) -> Result<Vec<u8>, FetchError>;
}
