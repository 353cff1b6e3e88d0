//! Announcement text for the speech-synthesis fallback, and the request
//! glue that pairs it with a clip address.
//!
//! Readings are katakana so the synthesizer pronounces them as a table
//! caller would. When a honba count is set, the caller declares the base
//! score first and then the adjusted score.

use serde::Serialize;

use crate::domain::{ClipAddress, Payment, PayerRole, ScoreEntry, WinType, locate};

const DIGITS: [&str; 10] = [
    "", "イチ", "ニ", "サン", "ヨン", "ゴ", "ロク", "ナナ", "ハチ", "キュウ",
];

const TENS: [&str; 10] = [
    "",
    "ジュウ",
    "ニジュウ",
    "サンジュウ",
    "ヨンジュウ",
    "ゴジュウ",
    "ロクジュウ",
    "ナナジュウ",
    "ハチジュウ",
    "キュウジュウ",
];

// 300, 600 and 800 are voiced or geminated; not plain concatenation.
const HUNDREDS: [&str; 10] = [
    "",
    "ヒャク",
    "ニヒャク",
    "サンビャク",
    "ヨンヒャク",
    "ゴヒャク",
    "ロッピャク",
    "ナナヒャク",
    "ハッピャク",
    "キュウヒャク",
];

// 3000 and 8000 likewise.
const THOUSANDS: [&str; 10] = [
    "",
    "セン",
    "ニセン",
    "サンゼン",
    "ヨンセン",
    "ゴセン",
    "ロクセン",
    "ナナセン",
    "ハッセン",
    "キュウセン",
];

/// Topic particle, spelled phonetically so it is read "wa".
const TOPIC: &str = "わ";
const SEPARATOR: &str = "、";
const ALL_SUFFIX: &str = "オール";

/// Read a number aloud in katakana.
///
/// Exact for 0–99,999. Larger values read the 万 count with the same rules.
#[must_use]
pub fn spoken_number(n: u32) -> String {
    if n == 0 {
        return "ゼロ".to_string();
    }

    let mut out = String::new();
    let man = n / 10_000;
    if man > 0 {
        if man < 10 {
            out.push_str(DIGITS[man as usize]);
        } else {
            out.push_str(&below_man(man));
        }
        out.push_str("マン");
    }
    out.push_str(&below_man(n % 10_000));
    out
}

fn below_man(n: u32) -> String {
    let n = (n % 10_000) as usize;
    let mut out = String::new();
    out.push_str(THOUSANDS[n / 1000]);
    out.push_str(HUNDREDS[(n % 1000) / 100]);
    out.push_str(TENS[(n % 100) / 10]);
    out.push_str(DIGITS[n % 10]);
    out
}

/// Build the spoken phrase for a payment.
///
/// | Payment | honba = 0 | honba > 0 |
/// |---|---|---|
/// | ron | `base` | `base わ、adjusted` |
/// | parent tsumo | `base オール` | `base わ、adjusted オール` |
/// | child tsumo | `child、parent` | `child、parent わ、child'、parent'` |
#[must_use]
pub fn phrase(payment: Payment, honba: u8) -> String {
    if honba == 0 {
        return match payment {
            Payment::Ron(v) => spoken_number(v),
            Payment::TsumoAll(v) => format!("{}{ALL_SUFFIX}", spoken_number(v)),
            Payment::TsumoSplit { child, parent } => {
                format!("{}{SEPARATOR}{}", spoken_number(child), spoken_number(parent))
            }
        };
    }

    match (payment, payment.with_honba(honba)) {
        (Payment::Ron(base), Payment::Ron(adjusted)) => {
            format!("{}{TOPIC}{SEPARATOR}{}", spoken_number(base), spoken_number(adjusted))
        }
        (Payment::TsumoAll(base), Payment::TsumoAll(adjusted)) => format!(
            "{}{TOPIC}{SEPARATOR}{}{ALL_SUFFIX}",
            spoken_number(base),
            spoken_number(adjusted)
        ),
        (
            Payment::TsumoSplit { child, parent },
            Payment::TsumoSplit {
                child: adj_child,
                parent: adj_parent,
            },
        ) => format!(
            "{}{SEPARATOR}{}{TOPIC}{SEPARATOR}{}{SEPARATOR}{}",
            spoken_number(child),
            spoken_number(parent),
            spoken_number(adj_child),
            spoken_number(adj_parent)
        ),
        // with_honba never changes the variant
        _ => String::new(),
    }
}

/// One user action's worth of audio: which clip to play and what to say if
/// the clip is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRequest {
    address: ClipAddress,
    fallback_text: String,
}

impl PlaybackRequest {
    pub fn new(address: ClipAddress, fallback_text: impl Into<String>) -> Self {
        Self {
            address,
            fallback_text: fallback_text.into(),
        }
    }

    #[must_use]
    pub const fn address(&self) -> &ClipAddress {
        &self.address
    }

    /// Phrase for speech synthesis; empty when the table has no amount.
    #[must_use]
    pub fn fallback_text(&self) -> &str {
        &self.fallback_text
    }
}

/// Build the request for a score button press.
///
/// `score` is the base (honba 0) table entry.
#[must_use]
pub fn announcement_request(
    score: &ScoreEntry,
    win: WinType,
    payer: PayerRole,
    honba: u8,
) -> PlaybackRequest {
    let address = locate(
        score.id,
        win == WinType::Ron,
        payer == PayerRole::Parent,
        honba,
    );
    let text = score
        .payment(win, payer)
        .map_or_else(String::new, |p| phrase(p, honba));
    PlaybackRequest::new(address, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::score_by_id;

    #[test]
    fn zero_reads_as_zero() {
        assert_eq!(spoken_number(0), "ゼロ");
    }

    #[test]
    fn irregular_hundreds_and_thousands() {
        assert_eq!(spoken_number(300), "サンビャク");
        assert_eq!(spoken_number(600), "ロッピャク");
        assert_eq!(spoken_number(800), "ハッピャク");
        assert_eq!(spoken_number(3000), "サンゼン");
        assert_eq!(spoken_number(8000), "ハッセン");
    }

    #[test]
    fn composite_readings() {
        assert_eq!(spoken_number(8600), "ハッセンロッピャク");
        assert_eq!(spoken_number(12000), "イチマンニセン");
        assert_eq!(spoken_number(1000), "セン");
        assert_eq!(spoken_number(100), "ヒャク");
        assert_eq!(spoken_number(7700), "ナナセンナナヒャク");
        assert_eq!(spoken_number(96000), "キュウマンロクセン");
        assert_eq!(spoken_number(99_999), "キュウマンキュウセンキュウヒャクキュウジュウキュウ");
    }

    #[test]
    fn man_count_above_nine() {
        assert_eq!(spoken_number(120_000), "ジュウニマン");
    }

    #[test]
    fn ron_phrase_without_honba() {
        assert_eq!(phrase(Payment::Ron(8000), 0), "ハッセン");
    }

    #[test]
    fn ron_phrase_states_base_then_adjusted() {
        assert_eq!(phrase(Payment::Ron(8000), 2), "ハッセンわ、ハッセンロッピャク");
    }

    #[test]
    fn parent_tsumo_phrase_appends_all() {
        assert_eq!(phrase(Payment::TsumoAll(4000), 0), "ヨンセンオール");
        assert_eq!(phrase(Payment::TsumoAll(4000), 1), "ヨンセンわ、ヨンセンヒャクオール");
    }

    #[test]
    fn child_tsumo_phrase_order() {
        let split = Payment::TsumoSplit {
            child: 2000,
            parent: 4000,
        };
        assert_eq!(phrase(split, 0), "ニセン、ヨンセン");
        // base-child, base-parent, adjusted-child, adjusted-parent
        assert_eq!(
            phrase(split, 3),
            "ニセン、ヨンセンわ、ニセンサンビャク、ヨンセンサンビャク"
        );
    }

    #[test]
    fn request_for_mangan_with_two_honba() {
        let mangan = score_by_id("mangan").unwrap();
        let req = announcement_request(mangan, WinType::Ron, PayerRole::Child, 2);
        assert_eq!(req.address().as_str(), "/audio/child_ron_mangan_h2.mp3");
        assert_eq!(req.fallback_text(), "ハッセンわ、ハッセンロッピャク");
    }

    #[test]
    fn request_address_matches_locate() {
        let entry = score_by_id("2-40").unwrap();
        let req = announcement_request(entry, WinType::Tsumo, PayerRole::Parent, 0);
        assert_eq!(req.address(), &locate("2-40", false, true, 0));
    }
}
