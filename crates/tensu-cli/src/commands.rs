//! Commands enum and shared argument groups.

use clap::{Args, Subcommand, ValueEnum};
use tensu_core::{MAX_HONBA, PayerRole, WinType};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Play the announcement for a score (clip, or speech if no clip)
    Announce(HandArgs),

    /// Print the phrase and clip address for a score without playing it
    Phrase(HandArgs),

    /// Download every clip into the offline cache
    Warm {
        /// Only report how many clips are cached; download nothing
        #[arg(long)]
        check: bool,
        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show or change playback settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Read score selections from stdin and announce each one
    Interactive,

    /// List the score table
    Scores {
        /// Include rarely used hands
        #[arg(short, long)]
        all: bool,
        /// Show amounts adjusted for this many honba
        #[arg(long, default_value_t = 0, value_parser = honba_parser())]
        honba: u8,
    },
}

/// One score button press.
#[derive(Args, Debug, Clone)]
pub struct HandArgs {
    /// Score id, e.g. `2-30`, `mangan`, `double-yakuman`
    pub score: String,

    /// How the hand was won
    #[arg(short, long, value_enum, default_value_t = Win::Ron)]
    pub win: Win,

    /// Role of the winning player
    #[arg(short, long, value_enum, default_value_t = Payer::Child)]
    pub payer: Payer,

    /// Honba count (0-10)
    #[arg(long, default_value_t = 0, value_parser = honba_parser())]
    pub honba: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Win {
    Ron,
    Tsumo,
}

impl From<Win> for WinType {
    fn from(win: Win) -> Self {
        match win {
            Win::Ron => Self::Ron,
            Win::Tsumo => Self::Tsumo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Payer {
    /// Dealer (oya)
    Parent,
    /// Non-dealer (ko)
    Child,
}

impl From<Payer> for PayerRole {
    fn from(payer: Payer) -> Self {
        match payer {
            Payer::Parent => Self::Parent,
            Payer::Child => Self::Child,
        }
    }
}

/// Settings subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print current settings
    Show {
        /// Print the stored JSON object instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Change one or more settings; out-of-range values are clamped
    Set {
        /// Output volume, 0.0-1.0
        #[arg(long)]
        volume: Option<f32>,
        /// Playback speed multiplier, 0.5-2.0
        #[arg(long)]
        speed: Option<f32>,
        /// Pitch multiplier, 0.5-2.0
        #[arg(long)]
        pitch: Option<f32>,
    },

    /// Restore defaults
    Reset,
}

fn honba_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=i64::from(MAX_HONBA))
}
