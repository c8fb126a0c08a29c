//! Import units from a saved extraction response

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use fleet_deploy::infrastructure::JsonResponseExtractor;

use crate::commands::context::AppContext;

pub fn cmd_import(ctx: &AppContext, file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let orchestrator = ctx.orchestrator()?;
    let report = orchestrator.import_extracted(&JsonResponseExtractor::new(), &bytes)?;

    if ctx.ui.json {
        ctx.emit_json(json!({
            "type": "import",
            "detected": report.detected,
            "added": report.added,
            "already_registered": report.already_registered,
            "invalid": report.invalid,
        }));
        return Ok(());
    }

    println!(
        "Detected {} unit(s); added {}",
        report.detected,
        report.added.len()
    );
    if !report.already_registered.is_empty() {
        println!(
            "Already registered: {}",
            report.already_registered.join(", ")
        );
    }
    if !report.invalid.is_empty() {
        eprintln!("Skipped invalid IDs: {}", report.invalid.join(", "));
    }
    if !report.added.is_empty() {
        println!("Imported units are not selected. Review them with `fleet-deploy units review`.");
    }
    Ok(())
}
