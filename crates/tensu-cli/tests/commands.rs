//! End-to-end command tests against a temporary data directory.
//!
//! Only commands that need no audio device are exercised here.

use std::path::Path;

use tensu_cli::{CliConfig, CliError, Commands, HandArgs, Payer, SettingsCommand, Win, bootstrap, run};
use tensu_core::{PlaybackSettings, settings_path};

fn config(root: &Path) -> CliConfig {
    CliConfig {
        data_dir: Some(root.to_path_buf()),
        base_url: "http://127.0.0.1:9".into(),
    }
}

fn hand(score: &str) -> HandArgs {
    HandArgs {
        score: score.into(),
        win: Win::Tsumo,
        payer: Payer::Parent,
        honba: 1,
    }
}

#[tokio::test]
async fn settings_set_clamps_and_persists() {
    let tmp = tempfile::tempdir().unwrap();

    run(
        config(tmp.path()),
        Commands::Settings {
            command: SettingsCommand::Set {
                volume: Some(1.7),
                speed: None,
                pitch: Some(0.8),
            },
        },
    )
    .await
    .unwrap();

    let raw = std::fs::read_to_string(settings_path(tmp.path())).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["volume"], 1.0);
    assert_eq!(stored["playbackSpeed"], 1.0);

    let ctx = bootstrap(config(tmp.path())).await.unwrap();
    let loaded = ctx.settings.get();
    assert!((loaded.volume - 1.0).abs() < f32::EPSILON);
    assert!((loaded.pitch - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn settings_set_without_values_is_a_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = run(
        config(tmp.path()),
        Commands::Settings {
            command: SettingsCommand::Set {
                volume: None,
                speed: None,
                pitch: None,
            },
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn non_finite_setting_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let err = run(
        config(tmp.path()),
        Commands::Settings {
            command: SettingsCommand::Set {
                volume: None,
                speed: Some(f32::NAN),
                pitch: None,
            },
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CliError::Arguments(_)));
    assert!(!settings_path(tmp.path()).exists());
}

#[tokio::test]
async fn legacy_settings_file_migrates_then_reset_restores_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(settings_path(tmp.path()), r#"{"volume":0.6,"pitch":"high"}"#).unwrap();

    let ctx = bootstrap(config(tmp.path())).await.unwrap();
    assert!((ctx.settings.get().pitch - 1.5).abs() < f32::EPSILON);
    assert!((ctx.settings.get().volume - 0.6).abs() < 1e-6);

    run(
        config(tmp.path()),
        Commands::Settings {
            command: SettingsCommand::Reset,
        },
    )
    .await
    .unwrap();

    let ctx = bootstrap(config(tmp.path())).await.unwrap();
    assert_eq!(ctx.settings.get(), PlaybackSettings::default());
}

#[tokio::test]
async fn phrase_and_scores_do_not_touch_the_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("never-created");

    run(config(&root), Commands::Phrase(hand("baiman"))).await.unwrap();
    run(config(&root), Commands::Scores { all: true, honba: 2 })
        .await
        .unwrap();

    assert!(!root.exists());
}

#[tokio::test]
async fn phrase_for_unknown_score_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let err = run(config(tmp.path()), Commands::Phrase(hand("7-77")))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Arguments(_)));
}

#[tokio::test]
async fn warm_check_on_empty_cache_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    run(
        config(tmp.path()),
        Commands::Warm {
            check: true,
            quiet: true,
        },
    )
    .await
    .unwrap();
    assert!(tmp.path().join("audio-cache").is_dir());
}

#[tokio::test]
async fn warm_against_unreachable_origin_finishes_with_misses() {
    let tmp = tempfile::tempdir().unwrap();
    // Every fetch fails fast on a closed loopback port; the run still ends
    // in Done and the command succeeds.
    run(
        config(tmp.path()),
        Commands::Warm {
            check: false,
            quiet: true,
        },
    )
    .await
    .unwrap();

    assert!(tmp.path().join("audio-cache").is_dir());
    assert!(!tmp.path().join("audio-cache/audio").exists());
}
