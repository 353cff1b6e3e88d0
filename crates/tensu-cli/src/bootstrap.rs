//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where adapters are wired together:
//! - JSON settings repository and the settings service (via tensu-core)
//! - Filesystem clip cache and HTTP fetcher (via tensu-cache)
//! - rodio output, system speech, voice selection and the playback engine
//!   (via tensu-voice), built on demand since most commands never play audio

use std::path::PathBuf;
use std::sync::Arc;

use tensu_cache::{CacheWarmer, FsClipCacheStore, HttpClipFetcher};
use tensu_core::{
    AUDIO_CACHE_NAMESPACE, AudioOutputPort, AudioSession, ClipCache, ClipCacheStore, ClipFetcher,
    SettingsService, SharedSettings, SpeechSynthesizer, ensure_directory, resolve_data_root,
    settings_path,
};
use tensu_voice::{
    EnginePorts, LocalAudioOutput, PlaybackEngine, SpeechBackend, SystemSpeechSynthesizer,
    UnlockController, VoicePreference, VoiceSelector, spawn_voice_watch,
};
use tokio::task::JoinHandle;

use crate::error::CliError;
use crate::parser::Cli;
use crate::settings_store::JsonSettingsRepository;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Explicit data directory; `None` uses the system data directory.
    pub data_dir: Option<PathBuf>,
    /// Origin serving the clips.
    pub base_url: String,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            base_url: cli.base_url.clone(),
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub data_root: PathBuf,
    pub settings: SettingsService,
    shared: SharedSettings,
    store: Arc<FsClipCacheStore>,
    fetcher: Arc<HttpClipFetcher>,
    warmer: Arc<CacheWarmer>,
}

impl CliContext {
    pub fn store(&self) -> Arc<dyn ClipCacheStore> {
        self.store.clone()
    }

    pub fn fetcher(&self) -> Arc<dyn ClipFetcher> {
        self.fetcher.clone()
    }

    /// The process-wide warmer over the full address space. Every caller
    /// shares one instance, so at most one warmup runs per process.
    pub fn warmer(&self) -> Arc<CacheWarmer> {
        Arc::clone(&self.warmer)
    }

    /// Start audio output and speech, and assemble the playback engine.
    ///
    /// A clip cache that cannot be opened is logged and skipped; the
    /// engine then fetches every clip from the network.
    pub async fn audio(&self) -> Result<AudioStack, CliError> {
        let local = Arc::new(LocalAudioOutput::spawn()?);
        let output: Arc<dyn AudioOutputPort> = local.clone();
        let session: Arc<dyn AudioSession> = local;

        let cache: Option<Arc<dyn ClipCache>> = match self.store.open(AUDIO_CACHE_NAMESPACE).await
        {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "Clip cache unavailable, playing from network only");
                None
            }
        };

        let speech: Arc<dyn SpeechSynthesizer> =
            SystemSpeechSynthesizer::spawn(SpeechBackend::platform_default());
        let voices = Arc::new(VoiceSelector::new(
            speech.clone(),
            VoicePreference::default(),
        ));
        let voice_watch = spawn_voice_watch(voices.clone());

        let engine = PlaybackEngine::new(EnginePorts {
            output: output.clone(),
            session: session.clone(),
            settings: Arc::new(self.shared.clone()),
            cache,
            fetcher: Some(self.fetcher()),
            speech: Some(speech),
            voices: Some(voices),
        });
        let unlock = Arc::new(UnlockController::new(session, output));

        Ok(AudioStack {
            engine,
            unlock,
            voice_watch,
        })
    }
}

/// Playback engine plus the collaborators that must live alongside it.
pub struct AudioStack {
    pub engine: PlaybackEngine,
    pub unlock: Arc<UnlockController>,
    voice_watch: JoinHandle<()>,
}

impl Drop for AudioStack {
    fn drop(&mut self) {
        self.engine.stop();
        self.voice_watch.abort();
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Resolves and creates the data root
/// 2. Loads persisted settings into the shared settings cell
/// 3. Creates the clip cache store, HTTP fetcher and the shared warmer
pub async fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let data_root = resolve_data_root(config.data_dir)?;
    ensure_directory(&data_root)?;
    tracing::debug!(root = %data_root.display(), "Resolved data root");

    let shared = SharedSettings::default();
    let repo = Arc::new(JsonSettingsRepository::new(settings_path(&data_root)));
    let settings = SettingsService::new(repo, shared.clone());
    settings.load().await?;

    let fetcher = HttpClipFetcher::new(config.base_url.as_str())
        .map_err(|e| CliError::Config(format!("HTTP client: {e}")))?;

    let store = Arc::new(FsClipCacheStore::new(&data_root));
    let fetcher = Arc::new(fetcher);
    let warmer = Arc::new(CacheWarmer::new(store.clone(), fetcher.clone()));

    Ok(CliContext {
        store,
        fetcher,
        warmer,
        data_root,
        settings,
        shared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensu_core::SettingsUpdate;

    fn config(dir: &std::path::Path) -> CliConfig {
        CliConfig {
            data_dir: Some(dir.to_path_buf()),
            base_url: "http://127.0.0.1:9".into(),
        }
    }

    #[tokio::test]
    async fn creates_data_root_and_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("data");

        let ctx = bootstrap(config(&root)).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(ctx.data_root, root);
        assert_eq!(ctx.settings.get(), tensu_core::PlaybackSettings::default());
    }

    #[tokio::test]
    async fn settings_persist_across_contexts() {
        let tmp = tempfile::tempdir().unwrap();

        let first = bootstrap(config(tmp.path())).await.unwrap();
        first
            .settings
            .update(SettingsUpdate {
                volume: Some(0.3),
                ..Default::default()
            })
            .await
            .unwrap();

        let second = bootstrap(config(tmp.path())).await.unwrap();
        assert!((second.settings.get().volume - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn corrupt_settings_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(settings_path(tmp.path()), "[1, 2").unwrap();

        let ctx = bootstrap(config(tmp.path())).await.unwrap();
        assert_eq!(ctx.settings.get(), tensu_core::PlaybackSettings::default());
    }

    #[tokio::test]
    async fn data_root_that_is_a_file_is_a_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        let err = bootstrap(config(&file)).await.err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[tokio::test]
    async fn warmer_is_shared_across_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = bootstrap(config(tmp.path())).await.unwrap();

        let first = ctx.warmer();
        let second = ctx.warmer();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(first.warm().is_some());
        assert!(ctx.warmer().warm().is_none());
    }
}
