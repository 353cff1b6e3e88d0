//! Core domain types and port definitions for tensu.
//!
//! Everything here is free of audio, network and filesystem adapters.
//! Adapter crates implement the traits in [`ports`]; the playback engine and
//! cache warmer drive them.
#![deny(unused_crate_dependencies)]

pub mod announce;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use announce::{PlaybackRequest, announcement_request, phrase, spoken_number};
pub use domain::{
    CLIP_ADDRESS_COUNT, ClipAddress, HONBA_RON_BONUS, HONBA_TSUMO_BONUS, MAX_HONBA, PayerRole,
    Payment, SCORE_COUNT, SCORE_TABLE, ScoreEntry, WarmupProgress, WarmupState, WinType,
    all_clip_addresses, locate, score_by_id, visible_scores,
};
pub use paths::{
    DATA_DIR_ENV, PathError, audio_cache_dir, data_root, ensure_directory, resolve_data_root,
    settings_path,
};
pub use ports::{
    AUDIO_CACHE_NAMESPACE, AudioOutputError, AudioOutputPort, AudioSession, CacheError, ClipCache,
    ClipCacheStore, ClipFetcher, ClipHandle, Completion, CompletionSignal, CoreError, FetchError,
    OutputParams, RepositoryError, SessionState, SettingsRepository, SettingsSource,
    SharedSettings, SpeechError, SpeechSynthesizer, Utterance, VoiceHandle,
};
pub use services::SettingsService;
pub use settings::{
    PersistedPitch, PersistedSettings, PlaybackSettings, SETTINGS_STORAGE_KEY, SettingsError,
    SettingsUpdate, validate_update,
};
