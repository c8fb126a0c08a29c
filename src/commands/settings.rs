//! General settings commands

use anyhow::Result;
use serde_json::json;

use crate::cli::SettingsCommand;
use crate::commands::context::AppContext;
use crate::ui::theme::{self, colors};
use crate::ui::views::table::Table;

pub fn cmd_settings(ctx: &AppContext, action: SettingsCommand) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    match action {
        SettingsCommand::List => {
            let entries = orchestrator.list_settings()?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "settings", "settings": entries}));
            } else if entries.is_empty() {
                println!("No settings stored.");
            } else {
                let mut table = Table::new(["KEY", "VALUE"]);
                for entry in entries {
                    table.row(vec![entry.key, entry.value]);
                }
                print!("{}", table.render());
            }
        }

        SettingsCommand::Set { key, value } => {
            orchestrator.set_setting(&key, &value)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "setting_updated", "key": key.trim()}));
            } else if value.trim().is_empty() {
                println!("Removed {}", key.trim());
            } else {
                println!("Set {}", key.trim());
            }
        }

        SettingsCommand::Unset { key } => {
            orchestrator.unset_setting(&key)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "setting_removed", "key": key.trim()}));
            } else {
                println!("Removed {}", key.trim());
            }
        }

        SettingsCommand::Check => {
            let missing = orchestrator.missing_settings()?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "settings_check", "missing": missing}));
            } else if missing.is_empty() {
                println!(
                    "{}",
                    theme::paint("All required settings are present.", colors::SUCCESS, ctx.ui.color)
                );
            } else {
                println!(
                    "{}",
                    theme::paint(
                        &format!("Missing required settings: {}", missing.join(", ")),
                        colors::WARNING,
                        ctx.ui.color
                    )
                );
            }
            if !missing.is_empty() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
