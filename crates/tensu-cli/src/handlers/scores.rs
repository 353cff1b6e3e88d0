//! Scores command handler.

use tensu_core::visible_scores;

use crate::presentation::{SCORE_HEADER, print_separator, score_row};

/// Print the score table, optionally with rare hands and honba applied.
pub fn execute(all: bool, honba: u8) {
    if honba > 0 {
        println!("Amounts include {honba} honba");
    }
    println!("{SCORE_HEADER}");
    print_separator(SCORE_HEADER.len());
    for entry in visible_scores(all) {
        println!("{}", score_row(&entry.adjusted_for_honba(honba)));
    }
}
