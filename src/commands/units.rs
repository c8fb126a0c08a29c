//! Unit registry and selection commands

use anyhow::Result;
use serde_json::json;

use crate::cli::UnitsCommand;
use crate::commands::context::AppContext;
use crate::ui::views::units::{render_review, render_units};

pub fn cmd_units(ctx: &AppContext, action: UnitsCommand) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    match action {
        UnitsCommand::Add { ids, group } => {
            let report = orchestrator.add_units(&ids.join(" "), group.as_deref())?;
            if ctx.ui.json {
                ctx.emit_json(json!({
                    "type": "units_added",
                    "added": report.added,
                    "already_registered": report.already_registered,
                    "invalid": report.invalid,
                }));
            } else {
                if !report.added.is_empty() {
                    println!("Added {}", report.added.join(", "));
                }
                if !report.already_registered.is_empty() {
                    println!(
                        "Already registered: {}",
                        report.already_registered.join(", ")
                    );
                }
                if !report.invalid.is_empty() {
                    eprintln!(
                        "Ignored invalid IDs (expected six digits starting with 62): {}",
                        report.invalid.join(", ")
                    );
                }
            }
        }

        UnitsCommand::Remove { ids } => {
            let removed = orchestrator.remove_units(&ids)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "units_removed", "removed": removed}));
            } else {
                println!("Removed {removed} unit(s)");
            }
        }

        UnitsCommand::List => {
            let session = orchestrator.snapshot();
            if ctx.ui.json {
                let units: Vec<_> = session
                    .units
                    .iter()
                    .map(|unit| {
                        json!({
                            "id": unit.id(),
                            "group": unit.normalized_group(),
                            "status": unit.status(),
                            "source": unit.source(),
                            "confidence": unit.confidence(),
                            "selected": session.is_selected(unit.id()),
                        })
                    })
                    .collect();
                ctx.emit_json(json!({
                    "type": "units",
                    "units": units,
                    "counts": session.units.status_counts(),
                }));
            } else {
                print!("{}", render_units(&session, &ctx.ui));
            }
        }

        UnitsCommand::Group { group, ids } => {
            orchestrator.set_group(&ids, group.as_deref())?;
            let session = orchestrator.snapshot();
            let group = ids
                .first()
                .and_then(|id| session.units.get(id))
                .map(|unit| unit.normalized_group())
                .unwrap_or_default();
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "group_set", "group": group, "units": ids}));
            } else {
                println!("{} -> {group}", ids.join(", "));
            }
        }

        UnitsCommand::Verify { id } => {
            let verified = orchestrator.toggle_verified(&id)?;
            if ctx.ui.json {
                ctx.emit_json(json!({"type": "verified", "unit": id, "verified": verified}));
            } else if verified {
                println!("{id} marked as reviewed");
            } else {
                println!("{id} needs review again");
            }
        }

        UnitsCommand::Review => {
            let session = orchestrator.snapshot();
            if ctx.ui.json {
                let ids: Vec<&str> = session.review_candidates().iter().map(|u| u.id()).collect();
                ctx.emit_json(json!({"type": "review", "units": ids}));
            } else {
                print!("{}", render_review(&session, &ctx.ui));
            }
        }
    }
    Ok(())
}

pub fn cmd_select(ctx: &AppContext, ids: &[String]) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let selected = orchestrator.select(ids)?;
    if ctx.ui.json {
        ctx.emit_json(json!({"type": "selected", "units": selected}));
    } else {
        println!("Selected {} unit(s): {}", selected.len(), selected.join(", "));
    }
    Ok(())
}

pub fn cmd_retry(ctx: &AppContext, id: &str) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let retried = orchestrator.retry_unit(id)?;
    if ctx.ui.json {
        ctx.emit_json(json!({"type": "retry", "unit": id, "reset": retried}));
    } else if retried {
        println!("{id} reset to PENDING and selected");
    } else {
        println!("{id} has not failed; nothing to retry");
    }
    Ok(())
}
