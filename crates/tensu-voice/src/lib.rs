//! Score announcement playback for tensu.
//!
//! - [`engine`]: the playback state machine (clip first, speech fallback,
//!   last request wins)
//! - [`voice_select`]: ranked synthesis voice picker
//! - [`unlock`]: one-shot gesture-triggered session activation
//! - [`audio_local`]: rodio adapter for the audio output and session ports
//! - [`speech`]: command-line speech synthesis adapter
#![deny(unused_crate_dependencies)]

pub mod audio_local;
pub mod audio_thread;
pub mod engine;
pub mod error;
pub mod playback;
pub mod speech;
pub mod unlock;
pub mod voice_select;

// Re-export key types for convenience
pub use audio_local::LocalAudioOutput;
pub use engine::{
    EnginePorts, EngineState, PlaybackEngine, PlaybackOutcome, SPEECH_BASE_RATE, SPEECH_LANG,
};
pub use error::VoiceError;
pub use speech::{SpeechBackend, SystemSpeechSynthesizer};
pub use unlock::{GestureKind, UnlockController};
pub use voice_select::{VoicePreference, VoiceSelector, spawn_voice_watch};

