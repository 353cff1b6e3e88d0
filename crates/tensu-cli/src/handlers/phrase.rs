//! Phrase command handler.
//!
//! Prints what `announce` would play without touching audio.

use tensu_core::{CoreError, PayerRole, PlaybackRequest, WinType, announcement_request, score_by_id};

use crate::commands::HandArgs;
use crate::error::CliError;

/// Resolve a score id and hand into the request the engine would receive.
pub fn request_for(
    score: &str,
    win: WinType,
    payer: PayerRole,
    honba: u8,
) -> Result<PlaybackRequest, CliError> {
    let entry = score_by_id(score).ok_or_else(|| CoreError::UnknownScore(score.to_string()))?;
    Ok(announcement_request(entry, win, payer, honba))
}

pub fn execute(args: &HandArgs) -> Result<(), CliError> {
    let request = request_for(&args.score, args.win.into(), args.payer.into(), args.honba)?;
    if request.fallback_text().is_empty() {
        println!("(no phrase)");
    } else {
        println!("{}", request.fallback_text());
    }
    println!("clip: {}", request.address());
    Ok(())
}
