//! Terminal progress for cache warmup, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use tensu_core::{WarmupProgress, WarmupState};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips {msg}";

/// Progress bar driven by [`WarmupProgress`] snapshots.
pub struct WarmupBar {
    bar: ProgressBar,
}

impl WarmupBar {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓░"),
            );
            bar
        };
        Self { bar }
    }

    pub fn update(&self, progress: &WarmupProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.cached as u64);
        self.bar.set_message(state_label(progress.state));
    }

    pub fn finish(&self, progress: &WarmupProgress) {
        self.update(progress);
        self.bar.finish();
    }
}

const fn state_label(state: WarmupState) -> &'static str {
    match state {
        WarmupState::Checking => "checking",
        WarmupState::Downloading => "downloading",
        WarmupState::Done => "done",
        WarmupState::Error => "failed",
    }
}

#[cfg(test)]
mod tests {
    use tensu_core::CLIP_ADDRESS_COUNT;

    use super::*;

    #[test]
    fn hidden_bar_tracks_position() {
        let bar = WarmupBar::new(true);
        bar.update(&WarmupProgress {
            state: WarmupState::Downloading,
            cached: 40,
            total: CLIP_ADDRESS_COUNT,
        });
        assert_eq!(bar.bar.position(), 40);
        assert_eq!(bar.bar.length(), Some(CLIP_ADDRESS_COUNT as u64));
    }
}
