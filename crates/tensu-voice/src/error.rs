//! Voice crate error types.

use tensu_core::{AudioOutputError, SpeechError};

/// Errors raised by the audio and speech adapters.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Failed to open the audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The output stream has not been opened yet (session suspended).
    #[error("Audio session is not running")]
    SessionNotRunning,

    /// The dedicated audio thread exited.
    #[error("Audio thread is no longer running")]
    AudioThreadDied,

    /// Clip bytes were not a decodable audio stream.
    #[error("Failed to decode clip: {0}")]
    Decode(String),

    /// A clip handle that was never issued or was already released.
    #[error("Unknown clip handle {0}")]
    UnknownClip(u64),

    /// No speech synthesis program could be launched.
    #[error("Speech synthesizer not available: {0}")]
    SpeechEngineMissing(String),

    /// IO error (process spawn, pipes).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VoiceError> for AudioOutputError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::OutputStreamError(reason) => Self::Unavailable(reason),
            VoiceError::SessionNotRunning | VoiceError::AudioThreadDied => {
                Self::Unavailable(err.to_string())
            }
            VoiceError::UnknownClip(id) => Self::UnknownHandle(id),
            VoiceError::Decode(reason) => Self::Decode {
                address: String::new(),
                reason,
            },
            other => Self::Start(other.to_string()),
        }
    }
}

impl From<VoiceError> for SpeechError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::SpeechEngineMissing(reason) => Self::Unavailable(reason),
            other => Self::Failed(other.to_string()),
        }
    }
}
