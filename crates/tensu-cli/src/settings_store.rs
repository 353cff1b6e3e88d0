//! JSON file implementation of [`SettingsRepository`].
//!
//! The whole settings object lives in one file,
//! `<data_root>/mahjong-score-settings.json`. A missing file is "nothing
//! stored"; an unparsable one is a serialization error so the settings
//! service can fall back to defaults.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tensu_core::{PersistedSettings, RepositoryError, SettingsRepository};

#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<Option<PersistedSettings>, RepositoryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RepositoryError::Storage(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn save(&self, settings: &PersistedSettings) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| RepositoryError::Storage(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensu_core::PersistedPitch;

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonSettingsRepository::new(tmp.path().join("s.json"));
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonSettingsRepository::new(tmp.path().join("nested/s.json"));
        let stored = PersistedSettings {
            volume: Some(0.5),
            playback_speed: Some(1.25),
            pitch: Some(PersistedPitch::Numeric(0.75)),
        };

        repo.save(&stored).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(stored));
        let raw = std::fs::read_to_string(repo.path()).unwrap();
        assert!(raw.contains("\"playbackSpeed\""));
    }

    #[tokio::test]
    async fn legacy_string_pitch_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("s.json");
        std::fs::write(&path, r#"{"volume":0.8,"pitch":"low"}"#).unwrap();

        let loaded = JsonSettingsRepository::new(&path).load().await.unwrap().unwrap();

        assert_eq!(loaded.pitch, Some(PersistedPitch::Legacy("low".into())));
        assert_eq!(loaded.playback_speed, None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("s.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonSettingsRepository::new(&path).load().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
