//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Thin wrappers that:
//!   1. Resolve CLI input into domain values
//!   2. Call the settings service, warmer or playback engine
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Construct adapters (that is bootstrap's job)
//! - Contain announcement or caching logic

pub mod announce;
pub mod interactive;
pub mod phrase;
pub mod scores;
pub mod settings;
pub mod warm;
