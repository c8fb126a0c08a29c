//! Selection preset commands

use anyhow::Result;
use serde_json::json;

use crate::cli::PresetCommand;
use crate::commands::context::AppContext;
use crate::ui::views::units::render_presets;

pub fn cmd_preset(ctx: &AppContext, action: PresetCommand) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    match action {
        PresetCommand::Save { name, ids } => {
            let ids = if ids.is_empty() {
                orchestrator.snapshot().selected
            } else {
                ids
            };
            let preset = orchestrator.save_preset(&name, &ids)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "preset_saved", "name": preset.name, "units": preset.ids}));
            } else {
                println!("Saved preset '{}' ({} unit(s))", preset.name, preset.ids.len());
            }
        }

        PresetCommand::SaveGroup { group } => {
            let preset = orchestrator.save_group_preset(&group)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "preset_saved", "name": preset.name, "units": preset.ids}));
            } else {
                println!("Saved preset '{}' ({} unit(s))", preset.name, preset.ids.len());
            }
        }

        PresetCommand::Apply { name } => {
            let selected = orchestrator.apply_preset(&name)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "selected", "preset": name, "units": selected}));
            } else if selected.is_empty() {
                println!("Preset '{name}' has no registered units; selection is now empty");
            } else {
                println!("Selected {} unit(s): {}", selected.len(), selected.join(", "));
            }
        }

        PresetCommand::Remove { name } => {
            let removed = orchestrator.remove_preset(&name)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "preset_removed", "name": name, "removed": removed}));
            } else if removed {
                println!("Removed preset '{name}'");
            } else {
                println!("No preset named '{name}'");
            }
        }

        PresetCommand::List => {
            let presets = orchestrator.snapshot().presets;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "presets", "presets": presets}));
            } else {
                print!("{}", render_presets(&presets));
            }
        }
    }
    Ok(())
}
