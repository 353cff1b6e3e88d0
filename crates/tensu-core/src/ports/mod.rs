//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `rodio`, `reqwest` or filesystem types in any signature
//! - Dispatch methods that must follow a request-token check are synchronous
//! - Repositories are minimal and load/save focused

pub mod audio_output;
pub mod audio_session;
pub mod clip_cache;
pub mod clip_fetcher;
pub mod settings_repository;
pub mod settings_source;
pub mod speech;

use thiserror::Error;

pub use audio_output::{
    AudioOutputError, AudioOutputPort, ClipHandle, Completion, CompletionSignal, OutputParams,
};
pub use audio_session::{AudioSession, SessionState};
pub use clip_cache::{AUDIO_CACHE_NAMESPACE, CacheError, ClipCache, ClipCacheStore};
pub use clip_fetcher::{ClipFetcher, FetchError};
pub use settings_repository::SettingsRepository;
pub use settings_source::{SettingsSource, SharedSettings};
pub use speech::{SpeechError, SpeechSynthesizer, Utterance, VoiceHandle};

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., io
/// errors) and provides a clean interface for services to handle storage
/// failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Storage backend error (filesystem, key-value store).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes, etc.).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Unknown score identifier.
    #[error("Unknown score: {0}")]
    UnknownScore(String),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
