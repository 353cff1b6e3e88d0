//! Interactive command handler.
//!
//! Reads one selection per line from stdin and announces it without
//! waiting for the previous announcement to end; a newer line always
//! replaces whatever is playing. Each submitted line is the terminal's
//! equivalent of a button press and is forwarded to the unlock controller.
//!
//! Line grammar:
//!
//! ```text
//! <score-id> [ron|tsumo] [parent|child] [honba]
//! set <volume|speed|pitch> <value>
//! stop | status | help | quit
//! ```

use tensu_core::{MAX_HONBA, PayerRole, ScoreEntry, SettingsUpdate, WinType, score_by_id};
use tensu_voice::{GestureKind, PlaybackOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::bootstrap::{AudioStack, CliContext};
use crate::error::CliError;
use crate::presentation::format_settings;

const HELP: &str = "\
  <score> [ron|tsumo] [parent|child] [honba]   announce, e.g. `mangan tsumo parent 2`
  set <volume|speed|pitch> <value>             change a setting
  stop                                         silence playback
  status                                       show engine state and settings
  quit                                         leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Announce {
        score: &'static ScoreEntry,
        win: WinType,
        payer: PayerRole,
        honba: u8,
    },
    Set(SettingsUpdate),
    Stop,
    Status,
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<Action, String> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(Action::Empty);
    };

    match first {
        "q" | "quit" | "exit" => return Ok(Action::Quit),
        "stop" => return Ok(Action::Stop),
        "status" => return Ok(Action::Status),
        "help" | "?" => return Ok(Action::Help),
        "set" => return parse_set(tokens.collect::<Vec<_>>().as_slice()),
        _ => {}
    }

    let score = score_by_id(first).ok_or_else(|| format!("unknown score '{first}'"))?;
    let mut win = WinType::Ron;
    let mut payer = PayerRole::Child;
    let mut honba = 0;
    for token in tokens {
        match token {
            "ron" => win = WinType::Ron,
            "tsumo" => win = WinType::Tsumo,
            "parent" | "oya" => payer = PayerRole::Parent,
            "child" | "ko" => payer = PayerRole::Child,
            other => {
                honba = other
                    .parse::<u8>()
                    .ok()
                    .filter(|h| *h <= MAX_HONBA)
                    .ok_or_else(|| format!("'{other}' is not a win type, role or honba 0-{MAX_HONBA}"))?;
            }
        }
    }
    Ok(Action::Announce {
        score,
        win,
        payer,
        honba,
    })
}

fn parse_set(args: &[&str]) -> Result<Action, String> {
    let [field, value] = args else {
        return Err("usage: set <volume|speed|pitch> <value>".into());
    };
    let value: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    let mut update = SettingsUpdate::default();
    match *field {
        "volume" => update.volume = Some(value),
        "speed" => update.speed = Some(value),
        "pitch" => update.pitch = Some(value),
        other => return Err(format!("unknown setting '{other}'")),
    }
    Ok(Action::Set(update))
}

pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let audio = ctx.audio().await?;
    let (gestures, gesture_rx) = broadcast::channel(8);
    let _unlock_task = audio.unlock.arm(gesture_rx);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        // No receivers once the unlock routine has run.
        let _ = gestures.send(GestureKind::PrimaryButtonDown);

        match parse_line(&line) {
            Ok(Action::Quit) => break,
            Ok(action) => handle(ctx, &audio, action).await,
            Err(message) => eprintln!("{message}"),
        }
    }
    audio.engine.stop();
    Ok(())
}

async fn handle(ctx: &CliContext, audio: &AudioStack, action: Action) {
    match action {
        Action::Announce {
            score,
            win,
            payer,
            honba,
        } => {
            let request = tensu_core::announcement_request(score, win, payer, honba);
            println!("{} {}", score.label, request.fallback_text());
            let handle = audio.engine.play(request);
            tokio::spawn(async move {
                if let Ok(PlaybackOutcome::Silent) = handle.await {
                    eprintln!("(nothing could be played)");
                }
            });
        }
        Action::Set(update) => match ctx.settings.update(update).await {
            Ok(settings) => println!("{}", format_settings(&settings)),
            Err(e) => eprintln!("{}", CliError::from(e)),
        },
        Action::Stop => audio.engine.stop(),
        Action::Status => {
            println!("engine = {:?}", audio.engine.state());
            println!("{}", format_settings(&ctx.settings.get()));
        }
        Action::Help => println!("{HELP}"),
        Action::Quit | Action::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announce(line: &str) -> (&'static str, WinType, PayerRole, u8) {
        match parse_line(line).unwrap() {
            Action::Announce {
                score,
                win,
                payer,
                honba,
            } => (score.id, win, payer, honba),
            other => panic!("expected announce, got {other:?}"),
        }
    }

    #[test]
    fn bare_score_is_child_ron() {
        assert_eq!(
            announce("2-30"),
            ("2-30", WinType::Ron, PayerRole::Child, 0)
        );
    }

    #[test]
    fn qualifiers_in_any_order() {
        assert_eq!(
            announce("  haneman 3 parent tsumo "),
            ("haneman", WinType::Tsumo, PayerRole::Parent, 3)
        );
        assert_eq!(
            announce("mangan oya 10"),
            ("mangan", WinType::Ron, PayerRole::Parent, 10)
        );
    }

    #[test]
    fn honba_beyond_limit_is_rejected() {
        assert!(parse_line("mangan 11").is_err());
        assert!(parse_line("mangan -1").is_err());
    }

    #[test]
    fn unknown_score_is_rejected() {
        let err = parse_line("3-90 ron").unwrap_err();
        assert!(err.contains("3-90"));
    }

    #[test]
    fn commands() {
        assert_eq!(parse_line(""), Ok(Action::Empty));
        assert_eq!(parse_line("stop"), Ok(Action::Stop));
        assert_eq!(parse_line("quit"), Ok(Action::Quit));
        assert_eq!(parse_line("?"), Ok(Action::Help));
        assert_eq!(parse_line("status"), Ok(Action::Status));
    }

    #[test]
    fn set_builds_partial_update() {
        assert_eq!(
            parse_line("set speed 1.5"),
            Ok(Action::Set(SettingsUpdate {
                speed: Some(1.5),
                ..Default::default()
            }))
        );
        assert!(parse_line("set speed").is_err());
        assert!(parse_line("set loudness 1").is_err());
        assert!(parse_line("set volume loud").is_err());
    }
}
