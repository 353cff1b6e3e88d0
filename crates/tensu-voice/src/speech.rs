//! System speech synthesis via the platform's command-line synthesizer.
//!
//! macOS ships `say`; elsewhere `espeak-ng` is used. Voice enumeration runs
//! in the background after construction, so [`SpeechSynthesizer::voices`]
//! starts empty and a voices-changed notification fires once the list is in.

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::{Context, bail};
use tensu_core::{Completion, SpeechError, SpeechSynthesizer, Utterance, VoiceHandle};
use tokio::process::Command;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::VoiceError;

/// Words per minute at `rate = 1.0` for both backends.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Which command-line synthesizer to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    /// macOS `say`.
    Say,
    /// `espeak-ng` (Linux, Windows).
    EspeakNg,
}

impl SpeechBackend {
    /// The backend for the current platform.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Say
        } else {
            Self::EspeakNg
        }
    }

    const fn program(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::EspeakNg => "espeak-ng",
        }
    }

    fn list_args(self) -> &'static [&'static str] {
        match self {
            Self::Say => &["-v", "?"],
            Self::EspeakNg => &["--voices"],
        }
    }

    fn parse_voices(self, listing: &str) -> Vec<VoiceHandle> {
        match self {
            Self::Say => listing.lines().filter_map(parse_say_line).collect(),
            Self::EspeakNg => listing.lines().skip(1).filter_map(parse_espeak_line).collect(),
        }
    }

    /// Command line for one utterance.
    fn speak_command(self, utterance: &Utterance) -> Command {
        let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate).round().max(1.0);
        let mut cmd = Command::new(self.program());
        match self {
            Self::Say => {
                if let Some(voice) = &utterance.voice {
                    cmd.arg("-v").arg(&voice.name);
                }
                cmd.arg("-r").arg(format!("{wpm}"));
                // `say` has no pitch flag; volume goes through an embedded command.
                cmd.arg(format!("[[volm {:.2}]] {}", utterance.volume, utterance.text));
            }
            Self::EspeakNg => {
                let voice = utterance
                    .voice
                    .as_ref()
                    .map_or(utterance.lang.as_str(), |v| v.name.as_str());
                let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0);
                let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 200.0);
                cmd.arg("-v")
                    .arg(voice)
                    .arg("-s")
                    .arg(format!("{wpm}"))
                    .arg("-p")
                    .arg(format!("{pitch}"))
                    .arg("-a")
                    .arg(format!("{amplitude}"))
                    .arg(&utterance.text);
            }
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// `Otoya               ja_JP    # こんにちは…`
fn parse_say_line(line: &str) -> Option<VoiceHandle> {
    let head = line.split('#').next()?.trim_end();
    let (name, lang) = head.rsplit_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() || lang.is_empty() {
        return None;
    }
    Some(VoiceHandle::new(name, lang))
}

/// ` 5  ja              --/M      Japanese           jpx/ja`
fn parse_espeak_line(line: &str) -> Option<VoiceHandle> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [_pty, lang, _age_gender, name, ..] => Some(VoiceHandle::new(*name, *lang)),
        _ => None,
    }
}

async fn list_voices(backend: SpeechBackend) -> anyhow::Result<Vec<VoiceHandle>> {
    let output = Command::new(backend.program())
        .args(backend.list_args())
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("failed to run {}", backend.program()))?;
    if !output.status.success() {
        bail!("{} exited with {}", backend.program(), output.status);
    }
    let listing = String::from_utf8(output.stdout).context("voice listing is not UTF-8")?;
    Ok(backend.parse_voices(&listing))
}

/// [`SpeechSynthesizer`] backed by a child process per utterance.
pub struct SystemSpeechSynthesizer {
    backend: SpeechBackend,
    voices: Arc<RwLock<Vec<VoiceHandle>>>,
    changed: broadcast::Sender<()>,
    current: Mutex<CancellationToken>,
}

impl SystemSpeechSynthesizer {
    /// Create the synthesizer and start loading the voice list.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(backend: SpeechBackend) -> Arc<Self> {
        let (changed, _) = broadcast::channel(8);
        let synth = Arc::new(Self {
            backend,
            voices: Arc::new(RwLock::new(Vec::new())),
            changed,
            current: Mutex::new(CancellationToken::new()),
        });

        let voices = Arc::clone(&synth.voices);
        let changed = synth.changed.clone();
        tokio::spawn(async move {
            match list_voices(backend).await {
                Ok(list) => {
                    tracing::debug!(count = list.len(), "Speech voices loaded");
                    *voices.write().unwrap_or_else(PoisonError::into_inner) = list;
                    let _ = changed.send(());
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "Could not list speech voices");
                }
            }
        });
        synth
    }

    fn replace_token(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }
}

impl SpeechSynthesizer for SystemSpeechSynthesizer {
    fn voices(&self) -> Vec<VoiceHandle> {
        self.voices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn voices_changed(&self) -> broadcast::Receiver<()> {
        self.changed.subscribe()
    }

    fn speak(&self, utterance: Utterance) -> Result<Completion, SpeechError> {
        let token = self.replace_token();
        let mut child = self
            .backend
            .speak_command(&utterance)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VoiceError::SpeechEngineMissing(format!(
                    "{} not found",
                    self.backend.program()
                )),
                _ => VoiceError::Io(e),
            })?;

        let (done, completion) = Completion::channel();
        tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status),
                () = token.cancelled() => None,
            };
            // Any exit ends the utterance; only cancellation drops `done`.
            match exited {
                Some(Ok(status)) => {
                    if !status.success() {
                        tracing::warn!(%status, "Speech process failed");
                    }
                    done.finish();
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Speech process wait failed");
                    done.finish();
                }
                None => {
                    let _ = child.kill().await;
                }
            }
        });
        Ok(completion)
    }

    fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}
