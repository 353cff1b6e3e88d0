//! Local rodio adapter for [`AudioOutputPort`] and [`AudioSession`].
//!
//! One [`LocalAudioOutput`] serves both ports: the session is the output
//! stream on the audio thread, and clips play through the same stream.
//! Decoded clips are kept here, keyed by handle id, until released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tensu_core::{
    AudioOutputError, AudioOutputPort, AudioSession, ClipAddress, ClipHandle, Completion,
    OutputParams, SessionState,
};

use crate::audio_thread::AudioThreadHandle;
use crate::error::VoiceError;
use crate::playback::{DecodedClip, decode_clip};

/// rodio-backed output and session.
pub struct LocalAudioOutput {
    audio: Arc<AudioThreadHandle>,
    clips: Mutex<HashMap<u64, DecodedClip>>,
    next_id: AtomicU64,
    state: Mutex<SessionState>,
}

impl LocalAudioOutput {
    /// Spawn the audio thread. The session starts suspended.
    pub fn spawn() -> Result<Self, VoiceError> {
        Ok(Self {
            audio: Arc::new(AudioThreadHandle::spawn()?),
            clips: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            state: Mutex::new(SessionState::Suspended),
        })
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Number of decoded clips currently held.
    pub fn loaded_clips(&self) -> usize {
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl AudioOutputPort for LocalAudioOutput {
    async fn load(
        &self,
        address: &ClipAddress,
        bytes: Vec<u8>,
    ) -> Result<ClipHandle, AudioOutputError> {
        let clip = tokio::task::spawn_blocking(move || decode_clip(bytes))
            .await
            .map_err(|e| AudioOutputError::Decode {
                address: address.to_string(),
                reason: e.to_string(),
            })?
            .map_err(|e| AudioOutputError::Decode {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, clip);
        Ok(ClipHandle::new(id))
    }

    /// Waits only for the audio thread to attach a sink to the already
    /// open stream; device I/O happens in [`AudioSession::resume`].
    fn play(
        &self,
        handle: &ClipHandle,
        params: OutputParams,
    ) -> Result<Completion, AudioOutputError> {
        let clip = self
            .clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle.id())
            .cloned()
            .ok_or(VoiceError::UnknownClip(handle.id()))?;

        let (done, completion) = Completion::channel();
        self.audio.play(clip, params.volume, params.rate, done)?;
        Ok(completion)
    }

    fn stop(&self) {
        self.audio.stop();
    }

    fn release(&self, handle: ClipHandle) {
        self.clips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id());
    }

    fn prime(&self) -> Result<(), AudioOutputError> {
        Ok(self.audio.prime()?)
    }
}

#[async_trait]
impl AudioSession for LocalAudioOutput {
    fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opening the default device can block, so the round trip to the
    /// audio thread runs on the blocking pool.
    async fn resume(&self) -> Result<(), AudioOutputError> {
        let audio = Arc::clone(&self.audio);
        let opened = tokio::task::spawn_blocking(move || audio.open())
            .await
            .unwrap_or(Err(VoiceError::AudioThreadDied));
        match opened {
            Ok(()) => {
                self.set_state(SessionState::Running);
                Ok(())
            }
            Err(VoiceError::AudioThreadDied) => {
                self.set_state(SessionState::Closed);
                Err(VoiceError::AudioThreadDied.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn play_silence(&self) -> Result<(), AudioOutputError> {
        Ok(self.audio.play_silence()?)
    }
}
