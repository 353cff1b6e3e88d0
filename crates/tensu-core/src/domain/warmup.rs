//! Offline cache warmup progress.

use serde::{Deserialize, Serialize};

/// Phase of a warmup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmupState {
    /// Enumerating addresses and reading the cache index.
    Checking,
    Downloading,
    /// Terminal. Individual items may still have failed.
    Done,
    /// Terminal. The cache store could not be opened.
    Error,
}

impl WarmupState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// A progress snapshot emitted by the cache warmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupProgress {
    pub state: WarmupState,
    pub cached: usize,
    pub total: usize,
}

impl WarmupProgress {
    #[must_use]
    pub const fn checking() -> Self {
        Self {
            state: WarmupState::Checking,
            cached: 0,
            total: 0,
        }
    }

    #[must_use]
    pub const fn with_state(self, state: WarmupState) -> Self {
        Self { state, ..self }
    }

    /// Whether every known address is cached.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.cached >= self.total
    }
}

impl Default for WarmupProgress {
    fn default() -> Self {
        Self::checking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_state() {
        let p = WarmupProgress {
            state: WarmupState::Downloading,
            cached: 3,
            total: 10,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"state":"downloading","cached":3,"total":10}"#);
    }

    #[test]
    fn terminal_states() {
        assert!(WarmupState::Done.is_terminal());
        assert!(WarmupState::Error.is_terminal());
        assert!(!WarmupState::Checking.is_terminal());
        assert!(!WarmupState::Downloading.is_terminal());
    }
}
