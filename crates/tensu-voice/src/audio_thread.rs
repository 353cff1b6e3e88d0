//! Dedicated audio thread: isolates `!Send` audio resources from the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send/Sync`, it is confined to a single OS thread and every
//! operation is routed through an [`AudioCommand`].

use std::sync::mpsc;
use std::thread;

use tensu_core::CompletionSignal;

use crate::error::VoiceError;
use crate::playback::{ClipPlayback, DecodedClip};

// ── Commands ───────────────────────────────────────────────────────

/// A command sent to the audio thread.
enum AudioCommand {
    /// Open the output stream (session resume).
    Open {
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    /// Replace current playback with `clip`.
    Play {
        clip: DecodedClip,
        volume: f32,
        rate: f32,
        done: CompletionSignal,
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    /// Stop any active playback immediately (fire-and-forget).
    Stop,

    PlaySilence {
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    Prime {
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    /// Shut down the audio thread, releasing the stream.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio thread.
///
/// Request-reply methods block the caller until the audio thread responds;
/// none of them wait for audio to finish. Only [`open`](Self::open) touches
/// the device, so async callers run it on the blocking pool.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread. The output stream is not opened until
    /// [`open`](Self::open).
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let thread = thread::Builder::new()
            .name("tensu-audio".into())
            .spawn(move || Self::run(&cmd_rx))
            .map_err(|e| {
                VoiceError::OutputStreamError(format!("failed to spawn audio thread: {e}"))
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    pub fn open(&self) -> Result<(), VoiceError> {
        self.send_and_recv(|reply| AudioCommand::Open { reply })
    }

    pub fn play(
        &self,
        clip: DecodedClip,
        volume: f32,
        rate: f32,
        done: CompletionSignal,
    ) -> Result<(), VoiceError> {
        self.send_and_recv(|reply| AudioCommand::Play {
            clip,
            volume,
            rate,
            done,
            reply,
        })
    }

    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    pub fn play_silence(&self) -> Result<(), VoiceError> {
        self.send_and_recv(|reply| AudioCommand::PlaySilence { reply })
    }

    pub fn prime(&self) -> Result<(), VoiceError> {
        self.send_and_recv(|reply| AudioCommand::Prime { reply })
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command and block until the audio thread replies. Channel
    /// failures map to [`VoiceError::AudioThreadDied`].
    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, VoiceError>>) -> AudioCommand,
    ) -> Result<T, VoiceError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| VoiceError::AudioThreadDied)?;
        rx.recv().map_err(|_| VoiceError::AudioThreadDied)?
    }

    // ── Audio thread event loop ────────────────────────────────────

    fn run(cmd_rx: &mpsc::Receiver<AudioCommand>) {
        let mut playback = ClipPlayback::default();

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Open { reply } => {
                    let _ = reply.send(playback.open());
                }

                AudioCommand::Play {
                    clip,
                    volume,
                    rate,
                    done,
                    reply,
                } => {
                    let _ = reply.send(playback.play(clip, volume, rate, done));
                }

                AudioCommand::Stop => playback.stop(),

                AudioCommand::PlaySilence { reply } => {
                    let _ = reply.send(playback.play_silence());
                }

                AudioCommand::Prime { reply } => {
                    let _ = reply.send(playback.prime());
                }

                AudioCommand::Shutdown => break,
            }
        }

        playback.stop();
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // Best-effort shutdown; the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
