//! Session log and maintenance commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;

use fleet_deploy::infrastructure::fs::atomic_write;

use crate::cli::{LogsCommand, SessionCommand};
use crate::commands::context::AppContext;
use crate::ui::prompt::confirm;

/// `deploy_log_<YYYY-MM-DD_HHMMSS>.txt` under `dir`
fn default_export_path(dir: &Path, now: chrono::DateTime<Local>) -> PathBuf {
    dir.join(format!("deploy_log_{}.txt", now.format("%Y-%m-%d_%H%M%S")))
}

pub fn cmd_logs(ctx: &AppContext, action: LogsCommand) -> Result<()> {
    let lines = ctx.orchestrator()?.export_logs();

    match action {
        LogsCommand::Show { tail } => {
            let start = tail.map_or(0, |n| lines.len().saturating_sub(n));
            let shown = &lines[start..];
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "logs", "lines": shown}));
            } else if shown.is_empty() {
                println!("Session log is empty.");
            } else {
                for line in shown {
                    println!("{line}");
                }
            }
        }

        LogsCommand::Export { output } => {
            let path = output.unwrap_or_else(|| default_export_path(&ctx.root, Local::now()));
            let mut content = lines.join("\n");
            if !content.is_empty() {
                content.push('\n');
            }
            atomic_write(&path, content.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "logs_exported", "path": path, "lines": lines.len()}));
            } else {
                println!("Exported {} line(s) to {}", lines.len(), path.display());
            }
        }
    }
    Ok(())
}

pub fn cmd_session(ctx: &AppContext, action: SessionCommand) -> Result<()> {
    match action {
        SessionCommand::Clear { yes } => {
            let orchestrator = ctx.orchestrator()?;
            if !confirm(
                &ctx.ui,
                "Clear units, selection, logs and review marks? Presets, history and templates are kept.",
                yes,
            )? {
                println!("Aborted.");
                return Ok(());
            }
            orchestrator.clear_session()?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "session_cleared"}));
            } else {
                println!("Session cleared.");
            }
        }
    }
    Ok(())
}
