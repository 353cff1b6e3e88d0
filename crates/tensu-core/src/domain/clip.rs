//! Clip addressing: maps a win to the resource path of its voice clip.
//!
//! The same [`locate`] function feeds both the playback path and the cache
//! warmer's enumeration, so a warmed entry is always hit by the address the
//! engine asks for.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::score::{SCORE_COUNT, SCORE_TABLE};

/// Highest honba count that has pre-rendered clips.
pub const MAX_HONBA: u8 = 10;

/// Size of the clip address space: every score for both roles, both win
/// types and honba `0..=MAX_HONBA`.
pub const CLIP_ADDRESS_COUNT: usize = SCORE_COUNT * 2 * 2 * (MAX_HONBA as usize + 1);

/// How the hand was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinType {
    Ron,
    Tsumo,
}

impl WinType {
    #[must_use]
    pub const fn from_is_ron(is_ron: bool) -> Self {
        if is_ron { Self::Ron } else { Self::Tsumo }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ron => "ron",
            Self::Tsumo => "tsumo",
        }
    }
}

/// Role of the winning player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayerRole {
    /// Dealer.
    Parent,
    Child,
}

impl PayerRole {
    #[must_use]
    pub const fn from_is_parent(is_parent: bool) -> Self {
        if is_parent { Self::Parent } else { Self::Child }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
        }
    }
}

/// Resource path of a voice clip; also the durable cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipAddress(String);

impl ClipAddress {
    /// Wrap an existing address string (e.g. a key read back from a cache).
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClipAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the clip address for a win.
///
/// Format: `/audio/{parent|child}_{ron|tsumo}_{scoreId}[_h{honba}].mp3`,
/// with the honba suffix omitted at honba 0.
#[must_use]
pub fn locate(score_id: &str, is_ron: bool, is_parent: bool, honba: u8) -> ClipAddress {
    let player = PayerRole::from_is_parent(is_parent).as_str();
    let kind = WinType::from_is_ron(is_ron).as_str();
    let address = if honba > 0 {
        format!("/audio/{player}_{kind}_{score_id}_h{honba}.mp3")
    } else {
        format!("/audio/{player}_{kind}_{score_id}.mp3")
    };
    ClipAddress(address)
}

/// Every clip address the application can request:
/// all scores × {parent, child} × {ron, tsumo} × honba `0..=MAX_HONBA`.
#[must_use]
pub fn all_clip_addresses() -> Vec<ClipAddress> {
    let mut addresses = Vec::with_capacity(CLIP_ADDRESS_COUNT);
    for score in &SCORE_TABLE {
        for is_parent in [true, false] {
            for is_ron in [true, false] {
                for honba in 0..=MAX_HONBA {
                    addresses.push(locate(score.id, is_ron, is_parent, honba));
                }
            }
        }
    }
    addresses
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn mangan_child_ron_without_honba() {
        assert_eq!(
            locate("mangan", true, false, 0).as_str(),
            "/audio/child_ron_mangan.mp3"
        );
    }

    #[test]
    fn honba_suffix_is_appended() {
        assert_eq!(
            locate("mangan", true, false, 2).as_str(),
            "/audio/child_ron_mangan_h2.mp3"
        );
        assert_eq!(
            locate("2-30", false, true, 10).as_str(),
            "/audio/parent_tsumo_2-30_h10.mp3"
        );
    }

    #[test]
    fn locate_is_deterministic() {
        assert_eq!(locate("3-40", false, false, 4), locate("3-40", false, false, 4));
    }

    #[test]
    fn enumeration_covers_every_tuple_exactly_once() {
        let all = all_clip_addresses();
        assert_eq!(all.len(), CLIP_ADDRESS_COUNT);
        assert_eq!(all.len(), SCORE_TABLE.len() * 4 * (usize::from(MAX_HONBA) + 1));

        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());

        for score in &SCORE_TABLE {
            for is_parent in [true, false] {
                for is_ron in [true, false] {
                    for honba in 0..=MAX_HONBA {
                        assert!(unique.contains(&locate(score.id, is_ron, is_parent, honba)));
                    }
                }
            }
        }
    }
}
