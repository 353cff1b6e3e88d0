//! Settings repository trait definition.
//!
//! This port defines the interface for playback settings persistence.
//! Implementations handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::PersistedSettings;

/// Repository for the persisted settings object.
///
/// # Design Rules
///
/// - Works with the raw [`PersistedSettings`] shape so migration of legacy
///   values happens in one place (the settings service), not per backend
/// - Implementation handles JSON serialization internally
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the stored object. Returns `None` if nothing is stored.
    async fn load(&self) -> Result<Option<PersistedSettings>, RepositoryError>;

    /// Replace the stored object.
    async fn save(&self, settings: &PersistedSettings) -> Result<(), RepositoryError>;
}
