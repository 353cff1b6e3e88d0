//! Settings service - orchestrates settings operations.

use std::sync::Arc;

use crate::ports::{CoreError, RepositoryError, SettingsRepository, SettingsSource, SharedSettings};
use crate::settings::{PersistedSettings, PlaybackSettings, SettingsUpdate, validate_update};

/// Service for settings operations.
///
/// Owns the write side of [`SharedSettings`]; every successful update is
/// persisted first and then published to readers.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    shared: SharedSettings,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(repo: Arc<dyn SettingsRepository>, shared: SharedSettings) -> Self {
        Self { repo, shared }
    }

    /// Load persisted settings into the shared cell.
    ///
    /// A missing object yields defaults. An unreadable object also yields
    /// defaults, with a warning; only storage failures are returned.
    pub async fn load(&self) -> Result<PlaybackSettings, CoreError> {
        let settings = match self.repo.load().await {
            Ok(Some(persisted)) => persisted.migrate(),
            Ok(None) => PlaybackSettings::default(),
            Err(RepositoryError::Serialization(reason)) => {
                tracing::warn!(%reason, "Stored settings unreadable, using defaults");
                PlaybackSettings::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.shared.set(settings);
        Ok(settings)
    }

    /// Current in-memory settings.
    #[must_use]
    pub fn get(&self) -> PlaybackSettings {
        self.shared.current()
    }

    /// Update settings with partial changes.
    pub async fn update(&self, update: SettingsUpdate) -> Result<PlaybackSettings, CoreError> {
        validate_update(&update)?;
        let mut next = self.shared.current();
        next.merge(&update);
        self.repo.save(&PersistedSettings::from(next)).await?;
        self.shared.set(next);
        tracing::debug!(
            volume = next.volume,
            speed = next.speed,
            pitch = next.pitch,
            "Settings updated"
        );
        Ok(next)
    }

    /// Restore defaults and persist them.
    pub async fn reset(&self) -> Result<PlaybackSettings, CoreError> {
        let defaults = PlaybackSettings::default();
        self.repo.save(&PersistedSettings::from(defaults)).await?;
        self.shared.set(defaults);
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::settings_repository::MockSettingsRepository;
    use crate::settings::PersistedPitch;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MemorySettingsRepo {
        stored: Mutex<Option<PersistedSettings>>,
        corrupt: bool,
    }

    impl MemorySettingsRepo {
        fn with(stored: Option<PersistedSettings>) -> Self {
            Self {
                stored: Mutex::new(stored),
                corrupt: false,
            }
        }
    }

    #[async_trait]
    impl SettingsRepository for MemorySettingsRepo {
        async fn load(&self) -> Result<Option<PersistedSettings>, RepositoryError> {
            if self.corrupt {
                return Err(RepositoryError::Serialization("bad json".into()));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save(&self, settings: &PersistedSettings) -> Result<(), RepositoryError> {
            *self.stored.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_missing_is_default() {
        let service = SettingsService::new(
            Arc::new(MemorySettingsRepo::with(None)),
            SharedSettings::default(),
        );
        assert_eq!(service.load().await.unwrap(), PlaybackSettings::default());
    }

    #[tokio::test]
    async fn load_migrates_legacy_pitch_into_shared() {
        let shared = SharedSettings::default();
        let stored = PersistedSettings {
            pitch: Some(PersistedPitch::Legacy("low".into())),
            ..Default::default()
        };
        let service =
            SettingsService::new(Arc::new(MemorySettingsRepo::with(Some(stored))), shared.clone());
        service.load().await.unwrap();
        assert!((shared.current().pitch - 0.75).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn corrupt_store_falls_back_to_defaults() {
        let repo = MemorySettingsRepo {
            stored: Mutex::new(None),
            corrupt: true,
        };
        let service = SettingsService::new(Arc::new(repo), SharedSettings::default());
        assert_eq!(service.load().await.unwrap(), PlaybackSettings::default());
    }

    #[tokio::test]
    async fn update_clamps_persists_and_publishes() {
        let repo = Arc::new(MemorySettingsRepo::with(None));
        let shared = SharedSettings::default();
        let service = SettingsService::new(repo.clone(), shared.clone());

        let updated = service
            .update(SettingsUpdate {
                volume: Some(1.4),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!((updated.volume - 1.0).abs() < f32::EPSILON);

        let stored = repo.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored.volume, Some(1.0));
        assert!((shared.current().volume - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn update_rejects_non_finite() {
        let service = SettingsService::new(
            Arc::new(MemorySettingsRepo::with(None)),
            SharedSettings::default(),
        );
        let err = service
            .update(SettingsUpdate {
                speed: Some(f32::INFINITY),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Settings(_)));
    }

    #[tokio::test]
    async fn rejected_update_never_reaches_storage() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_save().times(0);
        let service = SettingsService::new(Arc::new(repo), SharedSettings::default());

        let result = service
            .update(SettingsUpdate {
                pitch: Some(f32::NAN),
                ..Default::default()
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_settings() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("disk full".into())));
        let shared = SharedSettings::default();
        let service = SettingsService::new(Arc::new(repo), shared.clone());

        let err = service
            .update(SettingsUpdate {
                volume: Some(0.2),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Repository(RepositoryError::Storage(_))));
        assert_eq!(shared.current(), PlaybackSettings::default());
    }

    #[tokio::test]
    async fn storage_failure_on_load_is_returned() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load()
            .times(1)
            .returning(|| Err(RepositoryError::Storage("permission denied".into())));
        let service = SettingsService::new(Arc::new(repo), SharedSettings::default());

        assert!(matches!(
            service.load().await,
            Err(CoreError::Repository(RepositoryError::Storage(_)))
        ));
    }

    #[tokio::test]
    async fn reset_persists_defaults() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_save()
            .withf(|stored| *stored == PersistedSettings::from(PlaybackSettings::default()))
            .times(1)
            .returning(|_| Ok(()));
        let shared = SharedSettings::default();
        shared.set(PlaybackSettings {
            volume: 0.3,
            ..PlaybackSettings::default()
        });
        let service = SettingsService::new(Arc::new(repo), shared.clone());

        assert_eq!(service.reset().await.unwrap(), PlaybackSettings::default());
        assert_eq!(shared.current(), PlaybackSettings::default());
    }
}
