//! Announce command handler.
//!
//! Treats the invocation itself as the unlocking gesture, plays one request
//! and waits for the audio to finish. Ctrl-C stops playback.

use tensu_voice::{EngineState, PlaybackOutcome};

use crate::bootstrap::{AudioStack, CliContext};
use crate::commands::HandArgs;
use crate::error::CliError;
use crate::handlers::phrase::request_for;

pub async fn execute(ctx: &CliContext, args: &HandArgs) -> Result<(), CliError> {
    let request = request_for(&args.score, args.win.into(), args.payer.into(), args.honba)?;
    let audio = ctx.audio().await?;
    audio.unlock.unlock().await;

    let outcome = audio
        .engine
        .play(request.clone())
        .await
        .map_err(|e| CliError::Core(format!("playback task failed: {e}")))?;

    match outcome {
        PlaybackOutcome::Playing => {
            println!("Playing {}", request.address());
            wait_until_idle(&audio).await;
        }
        PlaybackOutcome::Speaking => {
            println!("Speaking: {}", request.fallback_text());
            wait_until_idle(&audio).await;
        }
        PlaybackOutcome::Silent => {
            eprintln!("Nothing could be played for {}", request.address());
        }
        PlaybackOutcome::Superseded => {}
    }
    Ok(())
}

async fn wait_until_idle(audio: &AudioStack) {
    let mut states = audio.engine.subscribe();
    tokio::select! {
        _ = states.wait_for(|s| *s == EngineState::Idle) => {}
        _ = tokio::signal::ctrl_c() => audio.engine.stop(),
    }
}
