//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;
use tensu_cache::DEFAULT_BASE_URL;

use crate::commands::Commands;

/// Command-line interface for the mahjong score announcer.
#[derive(Parser)]
#[command(name = "tensu")]
#[command(about = "Announce mahjong scores aloud, with an offline clip cache")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (settings and clip cache)
    #[arg(long = "data-dir", env = "TENSU_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Origin serving the `/audio/*.mp3` clips
    #[arg(
        long = "base-url",
        env = "TENSU_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        global = true
    )]
    pub base_url: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Payer, SettingsCommand, Win};
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "tensu",
            "--verbose",
            "--data-dir",
            "/tmp/tensu",
            "--base-url",
            "https://scores.example",
            "scores",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tensu")));
        assert_eq!(cli.base_url, "https://scores.example");
    }

    #[test]
    fn announce_defaults_to_child_ron_without_honba() {
        let cli = Cli::parse_from(["tensu", "announce", "mangan"]);
        let Some(Commands::Announce(args)) = cli.command else {
            panic!("expected announce");
        };
        assert_eq!(args.score, "mangan");
        assert_eq!(args.win, Win::Ron);
        assert_eq!(args.payer, Payer::Child);
        assert_eq!(args.honba, 0);
    }

    #[test]
    fn honba_above_ten_is_rejected() {
        assert!(Cli::try_parse_from(["tensu", "phrase", "mangan", "--honba", "11"]).is_err());
        assert!(Cli::try_parse_from(["tensu", "phrase", "mangan", "--honba", "10"]).is_ok());
    }

    #[test]
    fn settings_set_takes_partial_values() {
        let cli = Cli::parse_from(["tensu", "settings", "set", "--volume", "0.4"]);
        let Some(Commands::Settings {
            command: SettingsCommand::Set { volume, speed, pitch },
        }) = cli.command
        else {
            panic!("expected settings set");
        };
        assert_eq!(volume, Some(0.4));
        assert_eq!(speed, None);
        assert_eq!(pitch, None);
    }
}
