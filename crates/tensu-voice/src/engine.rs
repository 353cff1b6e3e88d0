//! Playback engine: announces one request at a time, clip first, speech
//! as fallback.
//!
//! ```text
//!   Idle → Loading → Playing  → Idle
//!               └──→ Speaking → Idle
//! ```
//!
//! Every `play()` takes the next request token and halts whatever was
//! audible. The resolve work (session resume, cache, network, decode) runs
//! on a spawned task; each continuation re-checks the token under the
//! engine mutex before any side effect, so a superseded request can finish
//! its fetch but never produce sound. `play`, `stop` and the dispatch calls
//! made under the mutex are all synchronous, which makes the token check and
//! the side effect atomic with respect to each other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tensu_core::{
    AudioOutputError, AudioOutputPort, AudioSession, ClipAddress, ClipCache, ClipFetcher,
    ClipHandle, Completion, FetchError, OutputParams, PlaybackRequest, SettingsSource,
    SpeechSynthesizer, Utterance,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::voice_select::VoiceSelector;

/// Synthesized speech is noticeably slower than the recorded clips; this
/// factor is applied on top of the user's speed.
pub const SPEECH_BASE_RATE: f32 = 1.4;

/// Language tag for fallback utterances.
pub const SPEECH_LANG: &str = "ja-JP";

// ── Engine state ───────────────────────────────────────────────────

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    /// A request is resolving its clip.
    Loading,
    /// A clip is audible.
    Playing,
    /// Fallback speech is audible.
    Speaking,
}

/// How a single `play()` request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The clip started.
    Playing,
    /// The clip failed and fallback speech started.
    Speaking,
    /// A newer request or `stop()` took over; nothing was started.
    Superseded,
    /// Neither the clip nor speech could be started.
    Silent,
}

/// Everything the engine drives.
pub struct EnginePorts {
    pub output: Arc<dyn AudioOutputPort>,
    pub session: Arc<dyn AudioSession>,
    pub settings: Arc<dyn SettingsSource>,
    /// Read-only view of the warmed clip cache. `None` when the store could
    /// not be opened; playback then goes straight to the network.
    pub cache: Option<Arc<dyn ClipCache>>,
    pub fetcher: Option<Arc<dyn ClipFetcher>>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    pub voices: Option<Arc<VoiceSelector>>,
}

/// The one live playback, if any.
struct ActivePlayback {
    token: u64,
    /// Decoded clip; `None` while loading or speaking.
    handle: Option<ClipHandle>,
}

struct EngineInner {
    token: u64,
    active: Option<ActivePlayback>,
}

#[derive(Debug, thiserror::Error)]
enum ResolveError {
    #[error("clip not cached and no fetcher configured")]
    NoSource,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Output(#[from] AudioOutputError),
}

enum ClipStart {
    Started,
    Superseded,
}

// ── Playback engine ────────────────────────────────────────────────

/// Cheaply clonable handle to the playback state machine.
#[derive(Clone)]
pub struct PlaybackEngine {
    shared: Arc<EngineShared>,
}

struct EngineShared {
    ports: EnginePorts,
    inner: Mutex<EngineInner>,
    state_tx: watch::Sender<EngineState>,
}

impl PlaybackEngine {
    pub fn new(ports: EnginePorts) -> Self {
        let (state_tx, _) = watch::channel(EngineState::Idle);
        Self {
            shared: Arc::new(EngineShared {
                ports,
                inner: Mutex::new(EngineInner {
                    token: 0,
                    active: None,
                }),
                state_tx,
            }),
        }
    }

    /// Start announcing `request`, superseding anything in progress.
    ///
    /// Must be called from within a tokio runtime. The returned task
    /// resolves once the request is audible, superseded or given up.
    pub fn play(&self, request: PlaybackRequest) -> JoinHandle<PlaybackOutcome> {
        let token = {
            let mut inner = self.shared.lock();
            inner.token += 1;
            let token = inner.token;
            self.shared.halt(&mut inner);
            inner.active = Some(ActivePlayback {
                token,
                handle: None,
            });
            self.shared.set_state(EngineState::Loading);
            token
        };
        tracing::debug!(token, address = %request.address(), "Playback requested");

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.resolve(token, request).await })
    }

    /// Halt clip and speech, invalidate in-flight requests, go idle.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        inner.token += 1;
        self.shared.halt(&mut inner);
        self.shared.set_state(EngineState::Idle);
        tracing::debug!(token = inner.token, "Playback stopped");
    }

    pub fn state(&self) -> EngineState {
        *self.shared.state_tx.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.shared.state_tx.subscribe()
    }
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: EngineState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "Engine state changed");
        }
    }

    /// Stop output, release the active handle, cancel speech.
    fn halt(&self, inner: &mut EngineInner) {
        self.ports.output.stop();
        if let Some(active) = inner.active.take() {
            tracing::trace!(token = active.token, "Halting active playback");
            if let Some(handle) = active.handle {
                self.ports.output.release(handle);
            }
        }
        if let Some(speech) = &self.ports.speech {
            speech.cancel();
        }
    }

    fn is_current(&self, token: u64) -> bool {
        self.lock().token == token
    }

    async fn resolve(self: Arc<Self>, token: u64, request: PlaybackRequest) -> PlaybackOutcome {
        // The platform may have suspended the session since the unlock.
        if self.ports.session.state().needs_resume() {
            if let Err(e) = self.ports.session.resume().await {
                tracing::warn!(error = %e, "Audio session resume failed");
            }
        }
        if !self.is_current(token) {
            return PlaybackOutcome::Superseded;
        }

        match self.start_clip(token, request.address()).await {
            Ok(ClipStart::Started) => PlaybackOutcome::Playing,
            Ok(ClipStart::Superseded) => PlaybackOutcome::Superseded,
            Err(e) => {
                tracing::debug!(address = %request.address(), error = %e, "Clip unavailable, falling back to speech");
                self.speak_fallback(token, request.fallback_text())
            }
        }
    }

    async fn clip_bytes(&self, address: &ClipAddress) -> Result<Vec<u8>, ResolveError> {
        if let Some(cache) = &self.ports.cache {
            match cache.get(address.as_str()).await {
                Ok(Some(bytes)) => return Ok(bytes),
                Ok(None) => {}
                Err(e) => tracing::warn!(%address, error = %e, "Cache read failed"),
            }
        }
        let fetcher = self.ports.fetcher.as_ref().ok_or(ResolveError::NoSource)?;
        Ok(fetcher.fetch(address).await?)
    }

    async fn start_clip(
        self: &Arc<Self>,
        token: u64,
        address: &ClipAddress,
    ) -> Result<ClipStart, ResolveError> {
        let bytes = self.clip_bytes(address).await?;
        if !self.is_current(token) {
            return Ok(ClipStart::Superseded);
        }

        let handle = self.ports.output.load(address, bytes).await?;

        let mut inner = self.lock();
        if inner.token != token {
            self.ports.output.release(handle);
            return Ok(ClipStart::Superseded);
        }

        let settings = self.ports.settings.current();
        let params = OutputParams {
            volume: settings.volume,
            rate: settings.clip_rate(),
        };
        // Held across play: the adapter only hands the clip to its output
        // thread, so stop() cannot interleave between token check and start.
        match self.ports.output.play(&handle, params) {
            Ok(completion) => {
                inner.active = Some(ActivePlayback {
                    token,
                    handle: Some(handle),
                });
                self.set_state(EngineState::Playing);
                drop(inner);
                tracing::debug!(token, %address, rate = params.rate, "Clip playing");
                self.watch_completion(token, completion);
                Ok(ClipStart::Started)
            }
            Err(e) => {
                self.ports.output.release(handle);
                Err(e.into())
            }
        }
    }

    fn speak_fallback(self: &Arc<Self>, token: u64, text: &str) -> PlaybackOutcome {
        let mut inner = self.lock();
        if inner.token != token {
            return PlaybackOutcome::Superseded;
        }

        let Some(speech) = self.ports.speech.as_ref().filter(|_| !text.is_empty()) else {
            inner.active = None;
            self.set_state(EngineState::Idle);
            return PlaybackOutcome::Silent;
        };

        let settings = self.ports.settings.current();
        let utterance = Utterance {
            text: text.to_string(),
            lang: SPEECH_LANG.to_string(),
            volume: settings.volume,
            rate: settings.speed * SPEECH_BASE_RATE,
            pitch: settings.pitch,
            voice: self.ports.voices.as_ref().and_then(|v| v.resolve()),
        };

        match speech.speak(utterance) {
            Ok(completion) => {
                inner.active = Some(ActivePlayback {
                    token,
                    handle: None,
                });
                self.set_state(EngineState::Speaking);
                drop(inner);
                self.watch_completion(token, completion);
                PlaybackOutcome::Speaking
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech fallback unavailable");
                inner.active = None;
                self.set_state(EngineState::Idle);
                PlaybackOutcome::Silent
            }
        }
    }

    /// Return to idle on natural end, if the request is still current.
    fn watch_completion(self: &Arc<Self>, token: u64, completion: Completion) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            if !completion.wait().await {
                return;
            }
            let mut inner = shared.lock();
            if inner.token != token {
                return;
            }
            if let Some(active) = inner.active.take() {
                if let Some(handle) = active.handle {
                    shared.ports.output.release(handle);
                }
            }
            shared.set_state(EngineState::Idle);
            tracing::debug!(token, "Playback finished");
        });
    }
}
