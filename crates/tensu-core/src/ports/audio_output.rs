//! Audio output port: the single playback primitive the engine drives.
//!
//! Platform quirks (decoded-buffer playback, element playback, session
//! routing) live in adapters behind this trait, never in the engine.
//!
//! # Design Rules
//!
//! - `load` may suspend (decode); `play`, `stop`, `release` and `prime` do not,
//!   so the engine can check its request token and dispatch without an
//!   intervening suspension point.
//! - A [`ClipHandle`] is an ephemeral decoded resource. The engine releases
//!   every handle it obtained exactly once.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::ClipAddress;

/// Opaque handle to a decoded clip held by an adapter.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ClipHandle {
    id: u64,
}

impl ClipHandle {
    /// Adapters mint handles from their own id space.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Parameters applied when a clip starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputParams {
    /// Gain, 0.0–1.0.
    pub volume: f32,
    /// Resampling factor applied to both tempo and pitch.
    pub rate: f32,
}

/// Sending half of a completion signal, held by the adapter.
#[derive(Debug)]
pub struct CompletionSignal(oneshot::Sender<()>);

impl CompletionSignal {
    /// Report natural end of playback.
    pub fn finish(self) {
        let _ = self.0.send(());
    }
}

/// Resolves when playback ends. Dropping the [`CompletionSignal`] without
/// calling `finish` means the playback was stopped rather than finished.
#[derive(Debug)]
pub struct Completion(oneshot::Receiver<()>);

impl Completion {
    #[must_use]
    pub fn channel() -> (CompletionSignal, Self) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal(tx), Self(rx))
    }

    /// Wait for the end of playback. Returns `true` on natural end.
    pub async fn wait(self) -> bool {
        self.0.await.is_ok()
    }
}

/// Errors from the audio output adapter.
#[derive(Debug, Error)]
pub enum AudioOutputError {
    /// Clip bytes could not be decoded.
    #[error("Failed to decode {address}: {reason}")]
    Decode { address: String, reason: String },

    /// The output device or stream is unavailable.
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// Playback could not be started.
    #[error("Failed to start playback: {0}")]
    Start(String),

    /// Unknown or already released handle.
    #[error("Unknown clip handle {0}")]
    UnknownHandle(u64),
}

/// Port for the clip playback primitive.
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// Decode clip bytes into a playable resource.
    async fn load(&self, address: &ClipAddress, bytes: Vec<u8>)
    -> Result<ClipHandle, AudioOutputError>;

    /// Start playing a loaded clip, replacing anything currently playing.
    ///
    /// Called with the engine lock held; must not wait on device I/O.
    fn play(&self, handle: &ClipHandle, params: OutputParams)
    -> Result<Completion, AudioOutputError>;

    /// Halt playback immediately and rewind. Idempotent.
    fn stop(&self);

    /// Free the decoded resource behind a handle.
    fn release(&self, handle: ClipHandle);

    /// Muted play/pause cycle so later programmatic playback is allowed.
    fn prime(&self) -> Result<(), AudioOutputError>;
}
