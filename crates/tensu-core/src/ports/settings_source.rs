//! Read-only view of the current playback settings.
//!
//! The playback engine reads through this port at the moment of each
//! playback call, so a change made between a button press and its audio
//! starting is honoured.

use std::sync::{Arc, RwLock};

use crate::settings::PlaybackSettings;

/// Source of the current settings snapshot.
pub trait SettingsSource: Send + Sync {
    fn current(&self) -> PlaybackSettings;
}

/// In-memory settings cell shared between the settings service (writer) and
/// the playback engine (reader).
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<PlaybackSettings>>,
}

impl SharedSettings {
    #[must_use]
    pub fn new(initial: PlaybackSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.clamped())),
        }
    }

    /// Replace the snapshot. Values are clamped.
    pub fn set(&self, settings: PlaybackSettings) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = settings.clamped();
    }
}

impl SettingsSource for SharedSettings {
    fn current(&self) -> PlaybackSettings {
        *self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_updates() {
        let a = SharedSettings::default();
        let b = a.clone();
        a.set(PlaybackSettings {
            volume: 0.3,
            speed: 1.0,
            pitch: 1.0,
        });
        assert!((b.current().volume - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn set_clamps() {
        let s = SharedSettings::default();
        s.set(PlaybackSettings {
            volume: 4.0,
            speed: 9.0,
            pitch: 0.0,
        });
        let cur = s.current();
        assert!((cur.volume - 1.0).abs() < f32::EPSILON);
        assert!((cur.speed - 2.0).abs() < f32::EPSILON);
        assert!((cur.pitch - 0.5).abs() < f32::EPSILON);
    }
}
