//! Speech synthesis port: the fallback voice when no clip can be played.
//!
//! # Design Rules
//!
//! - Voice enumeration is synchronous but may return an empty list until the
//!   platform finishes loading; adapters announce list changes on the
//!   [`SpeechSynthesizer::voices_changed`] channel.
//! - `speak` dispatches without suspending, mirroring
//!   [`AudioOutputPort::play`](super::AudioOutputPort::play).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use super::Completion;

/// A synthesis voice exposed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceHandle {
    /// Platform voice name (e.g. `"Otoya"`).
    pub name: String,
    /// BCP-47-ish language tag (e.g. `"ja-JP"`, `"ja_JP"`, `"ja"`).
    pub lang: String,
}

impl VoiceHandle {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Everything needed to speak one phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    /// 0.0–1.0.
    pub volume: f32,
    /// 1.0 is the platform's default cadence.
    pub rate: f32,
    /// 1.0 is the voice's natural pitch.
    pub pitch: f32,
    pub voice: Option<VoiceHandle>,
}

/// Errors from the speech synthesis adapter.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No synthesis engine is installed or reachable.
    #[error("Speech synthesis unavailable: {0}")]
    Unavailable(String),

    /// The engine refused the utterance.
    #[error("Speech synthesis failed: {0}")]
    Failed(String),
}

/// Port for platform speech synthesis.
pub trait SpeechSynthesizer: Send + Sync {
    /// Voices currently known to the platform. May be empty early on.
    fn voices(&self) -> Vec<VoiceHandle>;

    /// Fires whenever the voice list changes.
    fn voices_changed(&self) -> broadcast::Receiver<()>;

    /// Start speaking, replacing any utterance in progress.
    fn speak(&self, utterance: Utterance) -> Result<Completion, SpeechError>;

    /// Cancel any utterance in progress. Idempotent.
    fn cancel(&self);
}
