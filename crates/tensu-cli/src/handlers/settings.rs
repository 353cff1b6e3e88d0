//! Settings command handler.

use tensu_core::{PersistedSettings, SettingsUpdate, settings_path};

use crate::bootstrap::CliContext;
use crate::commands::SettingsCommand;
use crate::error::CliError;
use crate::presentation::format_settings;

pub async fn execute(ctx: &CliContext, command: SettingsCommand) -> Result<(), CliError> {
    match command {
        SettingsCommand::Show { json } => {
            let current = ctx.settings.get();
            if json {
                let stored = serde_json::to_string_pretty(&PersistedSettings::from(current))
                    .map_err(|e| CliError::Core(e.to_string()))?;
                println!("{stored}");
            } else {
                println!("{}", format_settings(&current));
                println!("file   = {}", settings_path(&ctx.data_root).display());
            }
        }
        SettingsCommand::Set {
            volume,
            speed,
            pitch,
        } => {
            let update = SettingsUpdate {
                volume,
                speed,
                pitch,
            };
            if update == SettingsUpdate::default() {
                return Err(CliError::Arguments(
                    "pass at least one of --volume, --speed, --pitch".into(),
                ));
            }
            let updated = ctx.settings.update(update).await?;
            println!("{}", format_settings(&updated));
        }
        SettingsCommand::Reset => {
            let defaults = ctx.settings.reset().await?;
            println!("{}", format_settings(&defaults));
        }
    }
    Ok(())
}
