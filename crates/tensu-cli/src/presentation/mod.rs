//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Domain transforms belong in tensu-core

pub mod progress;
pub mod tables;

pub use progress::WarmupBar;
pub use tables::{SCORE_HEADER, format_amount, format_settings, print_separator, score_row};
