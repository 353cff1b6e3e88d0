//! Hardware audio session port.

use async_trait::async_trait;
use serde::Serialize;

use super::AudioOutputError;

/// Lifecycle state of the output session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Not yet activated, or suspended by the platform.
    Suspended,
    /// Interrupted (e.g. by another app); resumable like `Suspended`.
    Interrupted,
    Running,
    Closed,
}

impl SessionState {
    /// Whether [`AudioSession::resume`] should be attempted.
    #[must_use]
    pub const fn needs_resume(self) -> bool {
        matches!(self, Self::Suspended | Self::Interrupted)
    }
}

/// The device's audio output session, shared by the unlock controller and
/// the playback engine.
#[async_trait]
pub trait AudioSession: Send + Sync {
    fn state(&self) -> SessionState;

    /// Bring a suspended session back to `Running`.
    async fn resume(&self) -> Result<(), AudioOutputError>;

    /// Play a near-silent minimal buffer through the session.
    fn play_silence(&self) -> Result<(), AudioOutputError>;
}
