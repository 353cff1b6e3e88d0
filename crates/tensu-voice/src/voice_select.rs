//! Voice selector: best-effort pick of a synthesis voice.
//!
//! Platform voice enumeration is asynchronous and frequently empty on the
//! first query, so the selector caches whatever it finds and is re-run on
//! every voices-changed notification. A voice taken from the ranked
//! preference list is never replaced; a same-language fallback is kept only
//! until a preferred voice shows up.

use std::sync::{Arc, Mutex, PoisonError};

use tensu_core::{SpeechSynthesizer, VoiceHandle};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Preferred voice name fragments, best first.
pub const DEFAULT_PREFERRED_VOICES: [&str; 3] = ["Otoya", "Hattori", "Takumi"];

/// Language prefix accepted for the fallback voice.
pub const DEFAULT_TARGET_LANG: &str = "ja";

/// Ranked list of voice-name substrings plus the target locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePreference {
    pub ranked: Vec<String>,
    pub lang_prefix: String,
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self {
            ranked: DEFAULT_PREFERRED_VOICES.iter().map(|s| (*s).to_string()).collect(),
            lang_prefix: DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

impl VoicePreference {
    fn lang_matches(&self, voice: &VoiceHandle) -> bool {
        voice
            .lang
            .to_ascii_lowercase()
            .starts_with(&self.lang_prefix.to_ascii_lowercase())
    }
}

#[derive(Debug, Default)]
struct CachedVoice {
    handle: Option<VoiceHandle>,
    preferred: bool,
}

/// Owned voice-selection service, one per process.
pub struct VoiceSelector {
    synth: Arc<dyn SpeechSynthesizer>,
    preference: VoicePreference,
    cache: Mutex<CachedVoice>,
}

impl VoiceSelector {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>, preference: VoicePreference) -> Self {
        Self {
            synth,
            preference,
            cache: Mutex::new(CachedVoice::default()),
        }
    }

    /// Return the best voice known so far, refreshing the cache from the
    /// platform's current list.
    pub fn resolve(&self) -> Option<VoiceHandle> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.preferred {
            return cache.handle.clone();
        }

        let voices = self.synth.voices();
        if voices.is_empty() {
            return cache.handle.clone();
        }

        for wanted in &self.preference.ranked {
            if let Some(voice) = voices.iter().find(|v| v.name.contains(wanted.as_str())) {
                tracing::debug!(voice = %voice.name, "Resolved preferred voice");
                cache.handle = Some(voice.clone());
                cache.preferred = true;
                return cache.handle.clone();
            }
        }

        if cache.handle.is_none() {
            if let Some(voice) = voices.iter().find(|v| self.preference.lang_matches(v)) {
                tracing::debug!(voice = %voice.name, lang = %voice.lang, "Resolved fallback voice");
                cache.handle = Some(voice.clone());
            }
        }
        cache.handle.clone()
    }

    /// Whether the cached voice came from the preference list.
    pub fn has_preferred(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .preferred
    }
}

/// Re-resolve on every voices-changed notification until the synthesizer
/// drops its sender.
pub fn spawn_voice_watch(selector: Arc<VoiceSelector>) -> JoinHandle<()> {
    let mut changes = selector.synth.voices_changed();
    tokio::spawn(async move {
        // Voices may already be loaded before the first notification.
        selector.resolve();
        loop {
            match changes.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    selector.resolve();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensu_core::{Completion, SpeechError, Utterance};

    struct ListSynth {
        voices: Mutex<Vec<VoiceHandle>>,
        changed: broadcast::Sender<()>,
    }

    impl ListSynth {
        fn new(voices: Vec<VoiceHandle>) -> Arc<Self> {
            let (changed, _) = broadcast::channel(4);
            Arc::new(Self {
                voices: Mutex::new(voices),
                changed,
            })
        }

        fn set(&self, voices: Vec<VoiceHandle>) {
            *self.voices.lock().unwrap() = voices;
        }
    }

    impl SpeechSynthesizer for ListSynth {
        fn voices(&self) -> Vec<VoiceHandle> {
            self.voices.lock().unwrap().clone()
        }

        fn voices_changed(&self) -> broadcast::Receiver<()> {
            self.changed.subscribe()
        }

        fn speak(&self, _utterance: Utterance) -> Result<Completion, SpeechError> {
            Err(SpeechError::Unavailable("test".into()))
        }

        fn cancel(&self) {}
    }

    fn selector(synth: &Arc<ListSynth>) -> VoiceSelector {
        VoiceSelector::new(synth.clone(), VoicePreference::default())
    }

    #[test]
    fn empty_list_returns_none() {
        let synth = ListSynth::new(vec![]);
        assert_eq!(selector(&synth).resolve(), None);
    }

    #[test]
    fn ranked_order_wins() {
        let synth = ListSynth::new(vec![
            VoiceHandle::new("Kyoko", "ja-JP"),
            VoiceHandle::new("Microsoft Takumi", "ja-JP"),
            VoiceHandle::new("Hattori", "ja-JP"),
        ]);
        let sel = selector(&synth);
        assert_eq!(sel.resolve().unwrap().name, "Hattori");
        assert!(sel.has_preferred());
    }

    #[test]
    fn falls_back_to_first_japanese_voice() {
        let synth = ListSynth::new(vec![
            VoiceHandle::new("Alex", "en-US"),
            VoiceHandle::new("Kyoko", "ja_JP"),
        ]);
        let sel = selector(&synth);
        assert_eq!(sel.resolve().unwrap().name, "Kyoko");
        assert!(!sel.has_preferred());
    }

    #[test]
    fn fallback_upgrades_when_preferred_appears() {
        let synth = ListSynth::new(vec![VoiceHandle::new("Kyoko", "ja-JP")]);
        let sel = selector(&synth);
        assert_eq!(sel.resolve().unwrap().name, "Kyoko");

        synth.set(vec![
            VoiceHandle::new("Kyoko", "ja-JP"),
            VoiceHandle::new("Otoya", "ja-JP"),
        ]);
        assert_eq!(sel.resolve().unwrap().name, "Otoya");
    }

    #[test]
    fn preferred_never_downgrades() {
        let synth = ListSynth::new(vec![VoiceHandle::new("Takumi", "ja-JP")]);
        let sel = selector(&synth);
        assert_eq!(sel.resolve().unwrap().name, "Takumi");

        synth.set(vec![VoiceHandle::new("Kyoko", "ja-JP")]);
        assert_eq!(sel.resolve().unwrap().name, "Takumi");
        synth.set(vec![]);
        assert_eq!(sel.resolve().unwrap().name, "Takumi");
    }

    #[test]
    fn cached_fallback_survives_empty_list() {
        let synth = ListSynth::new(vec![VoiceHandle::new("Kyoko", "ja-JP")]);
        let sel = selector(&synth);
        sel.resolve();
        synth.set(vec![]);
        assert_eq!(sel.resolve().unwrap().name, "Kyoko");
    }

    #[tokio::test]
    async fn watch_resolves_on_change() {
        let synth = ListSynth::new(vec![]);
        let sel = Arc::new(selector(&synth));
        let task = spawn_voice_watch(sel.clone());

        synth.set(vec![VoiceHandle::new("Otoya", "ja-JP")]);
        synth.changed.send(()).unwrap();

        for _ in 0..50 {
            if sel.has_preferred() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(sel.has_preferred());
        task.abort();
    }
}
