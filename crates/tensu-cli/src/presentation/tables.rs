//! Table formatting for score and settings output.

use tensu_core::{PlaybackSettings, ScoreEntry};

/// Column header matching [`score_row`].
pub const SCORE_HEADER: &str = "ID              HAND        P.RON   P.TSUMO   C.RON   C.TSUMO";

/// Format a point amount, or `-` when the table has none.
pub fn format_amount(amount: Option<u32>) -> String {
    amount.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One aligned row of the score table.
pub fn score_row(entry: &ScoreEntry) -> String {
    let child_tsumo = match (entry.child_tsumo_child, entry.child_tsumo_parent) {
        (Some(child), Some(parent)) => format!("{child}/{parent}"),
        _ => "-".to_string(),
    };
    format!(
        "{:<15} {:<10} {:>6} {:>9} {:>7} {:>9}",
        entry.id,
        entry.label,
        format_amount(entry.parent_ron),
        format_amount(entry.parent_tsumo_all),
        format_amount(entry.child_ron),
        child_tsumo,
    )
}

/// Human-readable settings summary.
pub fn format_settings(settings: &PlaybackSettings) -> String {
    format!(
        "volume = {:.2}\nspeed  = {:.2}\npitch  = {:.2}",
        settings.volume, settings.speed, settings.pitch
    )
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}
