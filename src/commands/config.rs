//! Per-unit config file commands, templates and history

use anyhow::{Context, Result};
use serde_json::json;

use fleet_deploy::application::ConfigPreview;

use crate::cli::ConfigCommand;
use crate::commands::context::AppContext;
use crate::ui::prompt::confirm;
use crate::ui::views::config::{render_files, render_history, render_previews, render_templates};

fn preview_json(preview: &ConfigPreview) -> serde_json::Value {
    json!({
        "identity": preview.identity,
        "path": preview.path,
        "changed": preview.is_changed(),
        "applied_keys": preview.applied_keys,
        "changed_keys": preview.changed_keys,
        "error": preview.error,
    })
}

pub fn cmd_config(ctx: &AppContext, action: ConfigCommand) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    match action {
        ConfigCommand::Show { id, template } => {
            let previews = if template {
                orchestrator.preview_template(&id)?
            } else {
                orchestrator.load_unit_configs(&id)?
            };
            if ctx.ui.json {
                let files: Vec<_> = previews.iter().map(preview_json).collect();
                ctx.emit_json(json!({"type": "config_preview", "unit": id, "files": files}));
            } else {
                print!("{}", render_previews(&previews, template, &ctx.ui));
            }
        }

        ConfigCommand::Files { id } => {
            let files = orchestrator.list_unit_files(&id)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "files", "unit": id, "files": files}));
            } else {
                print!("{}", render_files(&id, &files));
            }
        }

        ConfigCommand::Cat { id, identity } => {
            let content = orchestrator.read_unit_file(&id, &identity)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "file", "unit": id, "identity": identity, "content": content}));
            } else {
                print!("{content}");
                if !content.ends_with('\n') {
                    println!();
                }
            }
        }

        ConfigCommand::Write { id, identity, from } => {
            let content = std::fs::read_to_string(&from)
                .with_context(|| format!("failed to read {}", from.display()))?;
            orchestrator.write_config(&id, &identity, &content)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "config_written", "unit": id, "identity": identity}));
            } else {
                println!("Saved {identity} for {id} and recorded it as an override");
            }
        }

        ConfigCommand::SaveOverrides { id } => {
            let files = orchestrator.save_config_overrides(&id)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "overrides_saved", "unit": id, "files": files}));
            } else {
                println!("Stored overrides for {files} config file(s) of {id}");
            }
        }

        ConfigCommand::ApplyTemplate { id, yes } => {
            let preview = orchestrator.preview_template(&id)?;
            let pending = preview.iter().filter(|p| p.is_changed()).count();
            if pending == 0 {
                if ctx.ui.json {
                    ctx.emit_json(json!({"type": "template_applied", "unit": id, "written": 0}));
                } else {
                    print!("{}", render_previews(&preview, false, &ctx.ui));
                    println!("Nothing to apply.");
                }
                return Ok(());
            }

            if !ctx.ui.json {
                print!("{}", render_previews(&preview, true, &ctx.ui));
            }
            let prompt = format!("Write {pending} config file(s) for {id}?");
            if !confirm(&ctx.ui, &prompt, yes)? {
                println!("Aborted.");
                return Ok(());
            }

            let applied = orchestrator.apply_template(&id)?;
            let written = applied.iter().filter(|p| p.is_changed()).count();
            if ctx.ui.json {
                let files: Vec<_> = applied.iter().map(preview_json).collect();
                ctx.emit_json(json!({"type": "template_applied", "unit": id, "written": written, "files": files}));
            } else {
                println!("Applied group template to {written} config file(s)");
            }
        }
    }
    Ok(())
}

pub fn cmd_templates(ctx: &AppContext) -> Result<()> {
    let templates = ctx.orchestrator()?.templates();
    if ctx.ui.json {
        ctx.emit_json(json!({"type": "templates", "templates": templates}));
    } else {
        print!("{}", render_templates(&templates));
    }
    Ok(())
}

pub fn cmd_history(ctx: &AppContext) -> Result<()> {
    let history = ctx.orchestrator()?.history();
    if ctx.ui.json {
        ctx.emit_json(json!({"type": "history", "history": history}));
    } else {
        print!("{}", render_history(&history, &ctx.ui));
    }
    Ok(())
}
