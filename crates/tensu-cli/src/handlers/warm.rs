//! Warm command handler.
//!
//! Drives the cache warmer to completion with a progress bar. Item failures
//! are reported but do not fail the command; running it again retries them.

use std::collections::HashSet;

use tensu_core::{
    AUDIO_CACHE_NAMESPACE, WarmupProgress, WarmupState, all_clip_addresses, audio_cache_dir,
};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::WarmupBar;

pub async fn execute(ctx: &CliContext, check: bool, quiet: bool) -> Result<(), CliError> {
    if check {
        let progress = cached_count(ctx).await?;
        println!("{}/{} clips cached", progress.cached, progress.total);
        return Ok(());
    }

    let warmer = ctx.warmer();
    let Some(mut updates) = warmer.warm() else {
        return Err(CliError::Core("cache warmup already started".into()));
    };

    let bar = WarmupBar::new(quiet);
    let mut last = warmer.latest();
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(progress) = update else { break };
                bar.update(&progress);
                last = progress;
            }
            _ = tokio::signal::ctrl_c() => {
                bar.finish(&last);
                println!("Interrupted with {}/{} clips cached", last.cached, last.total);
                return Ok(());
            }
        }
    }
    bar.finish(&last);

    match last.state {
        WarmupState::Done => {
            println!("{}/{} clips cached", last.cached, last.total);
            let missing = last.total - last.cached;
            if missing > 0 {
                println!("{missing} clips could not be downloaded; run `tensu warm` again to retry");
            }
            Ok(())
        }
        _ => Err(CliError::Storage(format!(
            "clip cache under {} could not be used",
            audio_cache_dir(&ctx.data_root).display()
        ))),
    }
}

/// Count cached clips without downloading anything.
async fn cached_count(ctx: &CliContext) -> Result<WarmupProgress, CliError> {
    let cache = ctx
        .store()
        .open(AUDIO_CACHE_NAMESPACE)
        .await
        .map_err(|e| CliError::Storage(e.to_string()))?;
    let present: HashSet<String> = cache
        .keys()
        .await
        .map_err(|e| CliError::Storage(e.to_string()))?;
    let addresses = all_clip_addresses();
    let cached = addresses
        .iter()
        .filter(|a| present.contains(a.as_str()))
        .count();
    Ok(WarmupProgress {
        state: WarmupState::Done,
        cached,
        total: addresses.len(),
    })
}
