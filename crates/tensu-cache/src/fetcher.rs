//! HTTP clip fetcher.

use async_trait::async_trait;
use tensu_core::{ClipAddress, ClipFetcher, FetchError};

/// Default origin serving `/audio/*.mp3`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";

/// Fetches `<base_url><address>` with reqwest.
///
/// No timeout is set beyond reqwest's defaults; a stuck request only
/// matters until a newer one supersedes it.
#[derive(Debug, Clone)]
pub struct HttpClipFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClipFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Full request URL for an address.
    pub fn url_for(&self, address: &ClipAddress) -> Result<String, FetchError> {
        let path = address.as_str();
        if !path.starts_with('/') {
            return Err(FetchError::InvalidAddress(path.to_string()));
        }
        Ok(format!("{}{path}", self.base_url))
    }
}

#[async_trait]
impl ClipFetcher for HttpClipFetcher {
    async fn fetch(&self, address: &ClipAddress) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(address)?;
        let network = |e: reqwest::Error| FetchError::Network {
            address: address.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(network)?;
        tracing::trace!(%url, len = bytes.len(), "Fetched clip");
        Ok(bytes.to_vec())
    }
}
