//! Session unlock: one-shot, gesture-triggered audio session activation.
//!
//! Output platforms may refuse audio that is not started from a user
//! gesture, and may drop the first programmatic playback silently. The
//! controller waits for the first qualifying gesture, then resumes the
//! session, pushes a one-sample silent buffer through it and primes the clip
//! primitive with a muted play/pause. It runs at most once per process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tensu_core::{AudioOutputPort, AudioSession};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A user input event forwarded by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    TouchStart,
    TouchEnd,
    PrimaryButtonDown,
    SecondaryButtonDown,
    KeyDown,
    Scroll,
}

impl GestureKind {
    /// Gestures that platforms accept as user activation for audio.
    #[must_use]
    pub const fn triggers_unlock(self) -> bool {
        matches!(
            self,
            Self::TouchStart | Self::TouchEnd | Self::PrimaryButtonDown
        )
    }
}

/// Runs the unlock routine once, on the first qualifying gesture.
pub struct UnlockController {
    session: Arc<dyn AudioSession>,
    output: Arc<dyn AudioOutputPort>,
    armed: AtomicBool,
    unlocked: AtomicBool,
}

impl UnlockController {
    pub fn new(session: Arc<dyn AudioSession>, output: Arc<dyn AudioOutputPort>) -> Self {
        Self {
            session,
            output,
            armed: AtomicBool::new(false),
            unlocked: AtomicBool::new(false),
        }
    }

    /// Start listening on `gestures`. Returns `None` if already armed.
    ///
    /// The receiver is dropped as soon as the routine has run, so the
    /// listener is gone for good.
    pub fn arm(
        self: &Arc<Self>,
        mut gestures: broadcast::Receiver<GestureKind>,
    ) -> Option<JoinHandle<()>> {
        if self.armed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Unlock controller already armed");
            return None;
        }
        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            loop {
                match gestures.recv().await {
                    Ok(kind) if kind.triggers_unlock() => {
                        drop(gestures);
                        this.unlock().await;
                        return;
                    }
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Gesture stream closed before unlock");
                        return;
                    }
                }
            }
        }))
    }

    /// Run the unlock steps. Later calls are no-ops. Step failures are
    /// logged and never re-arm.
    pub async fn unlock(&self) {
        if self.unlocked.swap(true, Ordering::SeqCst) {
            return;
        }

        if self.session.state().needs_resume() {
            if let Err(e) = self.session.resume().await {
                tracing::warn!(error = %e, "Audio session resume failed during unlock");
            }
        }
        if let Err(e) = self.session.play_silence() {
            tracing::warn!(error = %e, "Silent buffer playback failed during unlock");
        }
        if let Err(e) = self.output.prime() {
            tracing::warn!(error = %e, "Clip output priming failed during unlock");
        }
        tracing::info!(state = ?self.session.state(), "Audio session unlocked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_set() {
        assert!(GestureKind::TouchStart.triggers_unlock());
        assert!(GestureKind::TouchEnd.triggers_unlock());
        assert!(GestureKind::PrimaryButtonDown.triggers_unlock());
        assert!(!GestureKind::SecondaryButtonDown.triggers_unlock());
        assert!(!GestureKind::KeyDown.triggers_unlock());
        assert!(!GestureKind::Scroll.triggers_unlock());
    }
}
