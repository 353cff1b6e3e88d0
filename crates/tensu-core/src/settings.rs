//! Playback settings domain types, clamping and legacy migration.
//!
//! This module contains pure domain types with no infrastructure
//! dependencies. Persistence lives behind
//! [`SettingsRepository`](crate::ports::SettingsRepository).

use serde::{Deserialize, Serialize};

/// Storage key (and file stem) of the persisted settings object.
pub const SETTINGS_STORAGE_KEY: &str = "mahjong-score-settings";

pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);
pub const SPEED_RANGE: (f32, f32) = (0.5, 2.0);
pub const PITCH_RANGE: (f32, f32) = (0.5, 2.0);

/// User playback settings. Always within range once constructed through
/// [`PlaybackSettings::clamped`] or [`PersistedSettings::migrate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    /// Output gain, 0.0–1.0.
    pub volume: f32,
    /// Playback speed multiplier, 0.5–2.0.
    #[serde(rename = "playbackSpeed")]
    pub speed: f32,
    /// Pitch multiplier, 0.5–2.0.
    pub pitch: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            speed: 1.0,
            pitch: 1.0,
        }
    }
}

impl PlaybackSettings {
    /// Clamp every field into its allowed range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            volume: self.volume.clamp(VOLUME_RANGE.0, VOLUME_RANGE.1),
            speed: self.speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1),
            pitch: self.pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1),
        }
    }

    /// Clip playback rate. Speed and pitch are deliberately coupled into a
    /// single resampling factor.
    #[must_use]
    pub fn clip_rate(&self) -> f32 {
        self.speed * self.pitch
    }

    /// Apply a partial update, clamping the result.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(volume) = update.volume {
            self.volume = volume;
        }
        if let Some(speed) = update.speed {
            self.speed = speed;
        }
        if let Some(pitch) = update.pitch {
            self.pitch = pitch;
        }
        *self = self.clamped();
    }
}

/// Partial settings update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub volume: Option<f32>,
    #[serde(rename = "playbackSpeed")]
    pub speed: Option<f32>,
    pub pitch: Option<f32>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
}

/// Reject NaN and infinities; everything else is clamped rather than refused.
pub fn validate_update(update: &SettingsUpdate) -> Result<(), SettingsError> {
    for (field, value) in [
        ("volume", update.volume),
        ("playbackSpeed", update.speed),
        ("pitch", update.pitch),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(SettingsError::NotFinite { field, value: v });
            }
        }
    }
    Ok(())
}

// ── Persisted shape ────────────────────────────────────────────────

/// Pitch as stored on disk: numeric today, a named level in older versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedPitch {
    Numeric(f32),
    Legacy(String),
}

impl PersistedPitch {
    /// Numeric value of a legacy level. Unknown names read as normal.
    #[must_use]
    pub fn to_numeric(&self) -> f32 {
        match self {
            Self::Numeric(v) => *v,
            Self::Legacy(level) => match level.as_str() {
                "low" => 0.75,
                "high" => 1.5,
                "normal" => 1.0,
                other => {
                    tracing::warn!(level = other, "Unknown legacy pitch level, using normal");
                    1.0
                }
            },
        }
    }
}

/// The stored JSON object. Every field is optional so partial and legacy
/// objects still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSettings {
    pub volume: Option<f32>,
    pub playback_speed: Option<f32>,
    pub pitch: Option<PersistedPitch>,
}

impl PersistedSettings {
    /// Fill missing fields with defaults, convert legacy pitch, clamp.
    #[must_use]
    pub fn migrate(&self) -> PlaybackSettings {
        let defaults = PlaybackSettings::default();
        PlaybackSettings {
            volume: self.volume.filter(|v| v.is_finite()).unwrap_or(defaults.volume),
            speed: self
                .playback_speed
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.speed),
            pitch: self
                .pitch
                .as_ref()
                .map(PersistedPitch::to_numeric)
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.pitch),
        }
        .clamped()
    }
}

impl From<PlaybackSettings> for PersistedSettings {
    fn from(s: PlaybackSettings) -> Self {
        Self {
            volume: Some(s.volume),
            playback_speed: Some(s.speed),
            pitch: Some(PersistedPitch::Numeric(s.pitch)),
        }
    }
}
