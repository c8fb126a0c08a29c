//! Script catalogue command

use anyhow::Result;
use serde_json::json;

use fleet_deploy::domain::value_objects::ScriptAction;

use crate::commands::context::AppContext;
use crate::commands::deploy::{install_cancel_handler, run_sink};
use crate::ui::views::table::Table;

fn render_catalog(actions: &[ScriptAction]) -> String {
    let mut table = Table::new(["ID", "LABEL", "SCRIPT", "UNITS"]);
    for action in actions {
        table.row(vec![
            action.id.clone(),
            action.display_label().to_string(),
            action.path.clone(),
            if action.requires_units { "required" } else { "" }.to_string(),
        ]);
    }
    table.render()
}

pub fn cmd_run_action(ctx: &AppContext, action: Option<&str>, units: &[String]) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    let Some(action_id) = action else {
        let actions = &orchestrator.options().actions;
        if ctx.ui.json {
            ctx.emit_json(json!({"type": "actions", "actions": actions}));
        } else {
            print!("{}", render_catalog(actions));
        }
        return Ok(());
    };

    let units = if units.is_empty() {
        orchestrator.snapshot().selected
    } else {
        units.to_vec()
    };

    install_cancel_handler(&orchestrator)?;
    let sink = run_sink(ctx, "run-action");
    let report = orchestrator.run_action(action_id, &units, sink.as_ref())?;

    if !report.success {
        if !ctx.ui.json {
            if let Some(code) = report.exit_code {
                eprintln!("{} exited with code {code}", report.action_id);
            }
        }
        std::process::exit(1);
    }
    Ok(())
}
