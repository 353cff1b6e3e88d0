//! Static score table and honba arithmetic.
//!
//! Amounts follow the standard four-player table: a parent (dealer) win pays
//! 1.5x on ron and "all" on tsumo, a child win splits tsumo between the
//! parent and the other children.

use serde::Serialize;

use super::clip::{PayerRole, WinType};

/// Points added to a ron payment per honba.
pub const HONBA_RON_BONUS: u32 = 300;

/// Points added to each tsumo payment leg per honba.
pub const HONBA_TSUMO_BONUS: u32 = 100;

/// One row of the score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Stable identifier used in clip addresses (e.g. `"3-30"`, `"mangan"`).
    pub id: &'static str,
    pub han: u8,
    pub fu: u8,
    /// Display label.
    pub label: &'static str,
    pub parent_ron: Option<u32>,
    pub parent_tsumo_all: Option<u32>,
    pub child_ron: Option<u32>,
    /// Child tsumo: amount paid by the parent.
    pub child_tsumo_parent: Option<u32>,
    /// Child tsumo: amount paid by each other child.
    pub child_tsumo_child: Option<u32>,
    pub is_rare: bool,
    /// Mangan or above.
    pub is_mangan: bool,
}

impl ScoreEntry {
    #[allow(clippy::too_many_arguments)]
    const fn hand(
        id: &'static str,
        han: u8,
        fu: u8,
        label: &'static str,
        parent: (u32, u32),
        child: (u32, u32, u32),
        is_rare: bool,
        is_mangan: bool,
    ) -> Self {
        Self {
            id,
            han,
            fu,
            label,
            parent_ron: Some(parent.0),
            parent_tsumo_all: Some(parent.1),
            child_ron: Some(child.0),
            child_tsumo_parent: Some(child.1),
            child_tsumo_child: Some(child.2),
            is_rare,
            is_mangan,
        }
    }

    /// Return a copy with every present amount raised by the honba bonus.
    #[must_use]
    pub fn adjusted_for_honba(&self, honba: u8) -> Self {
        if honba == 0 {
            return *self;
        }
        let ron = u32::from(honba) * HONBA_RON_BONUS;
        let tsumo = u32::from(honba) * HONBA_TSUMO_BONUS;
        Self {
            parent_ron: self.parent_ron.map(|v| v + ron),
            parent_tsumo_all: self.parent_tsumo_all.map(|v| v + tsumo),
            child_ron: self.child_ron.map(|v| v + ron),
            child_tsumo_parent: self.child_tsumo_parent.map(|v| v + tsumo),
            child_tsumo_child: self.child_tsumo_child.map(|v| v + tsumo),
            ..*self
        }
    }

    /// Select the payment shape for a win type and payer role.
    ///
    /// Returns `None` when the table has no amount for that combination.
    #[must_use]
    pub fn payment(&self, win: WinType, payer: PayerRole) -> Option<Payment> {
        match (win, payer) {
            (WinType::Ron, PayerRole::Parent) => self.parent_ron.map(Payment::Ron),
            (WinType::Ron, PayerRole::Child) => self.child_ron.map(Payment::Ron),
            (WinType::Tsumo, PayerRole::Parent) => self.parent_tsumo_all.map(Payment::TsumoAll),
            (WinType::Tsumo, PayerRole::Child) => {
                match (self.child_tsumo_child, self.child_tsumo_parent) {
                    (Some(child), Some(parent)) => Some(Payment::TsumoSplit { child, parent }),
                    _ => None,
                }
            }
        }
    }
}

/// The amount(s) announced for one win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Payment {
    /// Single payment from the discarder.
    Ron(u32),
    /// Parent tsumo: every other player pays the same amount.
    TsumoAll(u32),
    /// Child tsumo: children pay `child`, the parent pays `parent`.
    TsumoSplit { child: u32, parent: u32 },
}

impl Payment {
    /// Apply the honba bonus: +300 per honba on ron, +100 per honba on each
    /// tsumo leg.
    #[must_use]
    pub fn with_honba(self, honba: u8) -> Self {
        let h = u32::from(honba);
        match self {
            Self::Ron(v) => Self::Ron(v + h * HONBA_RON_BONUS),
            Self::TsumoAll(v) => Self::TsumoAll(v + h * HONBA_TSUMO_BONUS),
            Self::TsumoSplit { child, parent } => Self::TsumoSplit {
                child: child + h * HONBA_TSUMO_BONUS,
                parent: parent + h * HONBA_TSUMO_BONUS,
            },
        }
    }
}

/// Number of hands in [`SCORE_TABLE`].
pub const SCORE_COUNT: usize = 25;

/// The full score table, in display order.
pub static SCORE_TABLE: [ScoreEntry; SCORE_COUNT] = [
    // 1 han
    ScoreEntry::hand("1-30", 1, 30, "1翻30符", (1500, 500), (1000, 500, 300), false, false),
    ScoreEntry::hand("1-40", 1, 40, "1翻40符", (2000, 700), (1300, 700, 400), false, false),
    ScoreEntry::hand("1-50", 1, 50, "1翻50符", (2400, 800), (1600, 800, 400), true, false),
    ScoreEntry::hand("1-60", 1, 60, "1翻60符", (2900, 1000), (2000, 1000, 500), true, false),
    ScoreEntry::hand("1-70", 1, 70, "1翻70符", (3400, 1200), (2300, 1200, 600), true, false),
    // 2 han
    ScoreEntry::hand("2-25", 2, 25, "2翻25符", (2400, 800), (1600, 800, 400), false, false),
    ScoreEntry::hand("2-30", 2, 30, "2翻30符", (2900, 1000), (2000, 1000, 500), false, false),
    ScoreEntry::hand("2-40", 2, 40, "2翻40符", (3900, 1300), (2600, 1300, 700), false, false),
    ScoreEntry::hand("2-50", 2, 50, "2翻50符", (4800, 1600), (3200, 1600, 800), false, false),
    ScoreEntry::hand("2-60", 2, 60, "2翻60符", (5800, 2000), (3900, 2000, 1000), true, false),
    ScoreEntry::hand("2-70", 2, 70, "2翻70符", (6800, 2300), (4500, 2300, 1200), true, false),
    // 3 han
    ScoreEntry::hand("3-25", 3, 25, "3翻25符", (4800, 1600), (3200, 1600, 800), false, false),
    ScoreEntry::hand("3-30", 3, 30, "3翻30符", (5800, 2000), (3900, 2000, 1000), false, false),
    ScoreEntry::hand("3-40", 3, 40, "3翻40符", (7700, 2600), (5200, 2600, 1300), false, false),
    ScoreEntry::hand("3-50", 3, 50, "3翻50符", (9600, 3200), (6400, 3200, 1600), true, false),
    ScoreEntry::hand("3-60", 3, 60, "3翻60符", (12000, 4000), (8000, 4000, 2000), false, true),
    // 4 han
    ScoreEntry::hand("4-25", 4, 25, "4翻25符", (9600, 3200), (6400, 3200, 1600), false, false),
    ScoreEntry::hand("4-30", 4, 30, "4翻30符", (12000, 4000), (8000, 4000, 2000), false, true),
    ScoreEntry::hand("4-40", 4, 40, "4翻40符", (12000, 4000), (8000, 4000, 2000), false, true),
    // Limit hands
    ScoreEntry::hand("mangan", 5, 0, "満貫", (12000, 4000), (8000, 4000, 2000), false, true),
    ScoreEntry::hand("haneman", 6, 0, "跳満", (18000, 6000), (12000, 6000, 3000), false, true),
    ScoreEntry::hand("baiman", 8, 0, "倍満", (24000, 8000), (16000, 8000, 4000), false, true),
    ScoreEntry::hand("sanbaiman", 11, 0, "三倍満", (36000, 12000), (24000, 12000, 6000), false, true),
    ScoreEntry::hand("yakuman", 13, 0, "役満", (48000, 16000), (32000, 16000, 8000), false, true),
    ScoreEntry::hand(
        "double-yakuman",
        26,
        0,
        "ダブル役満",
        (96000, 32000),
        (64000, 32000, 16000),
        true,
        true,
    ),
];

/// Look up a base (honba 0) entry by id.
pub fn score_by_id(id: &str) -> Option<&'static ScoreEntry> {
    SCORE_TABLE.iter().find(|s| s.id == id)
}

/// Entries visible in the grid, optionally hiding rare hands.
pub fn visible_scores(show_rare: bool) -> impl Iterator<Item = &'static ScoreEntry> {
    SCORE_TABLE.iter().filter(move |s| show_rare || !s.is_rare)
}
