//! Per-unit IP override commands

use anyhow::Result;
use serde_json::json;

use fleet_deploy::domain::value_objects::IpRole;

use crate::cli::IpCommand;
use crate::commands::context::AppContext;
use crate::ui::views::config::render_effective_ips;

pub fn cmd_ip(ctx: &AppContext, action: IpCommand) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;

    match action {
        IpCommand::Set { id, role, value } => {
            let changed = orchestrator.set_ip_override(&id, role, &value)?;
            let effective = orchestrator.effective_ips(&id)?;
            if ctx.ui.json {
                ctx.emit_json(json!({
                    "type": "ip_override",
                    "unit": id,
                    "role": role,
                    "changed": changed,
                    "effective": effective.get(role),
                }));
            } else if changed {
                println!(
                    "{id} {}: {}",
                    role.display_name(),
                    effective.get(role).unwrap_or("(unset)")
                );
            } else {
                println!("{id} {}: unchanged", role.display_name());
            }
        }

        IpCommand::Show { id } => {
            let effective = orchestrator.effective_ips(&id)?;
            if ctx.ui.json {
                let ips: serde_json::Map<String, serde_json::Value> = IpRole::ALL
                    .into_iter()
                    .map(|role| (role.settings_key().to_string(), json!(effective.get(role))))
                    .collect();
                ctx.emit_json(json!({"type": "ips", "unit": id, "ips": ips}));
            } else {
                print!("{}", render_effective_ips(&id, &effective, &ctx.ui));
            }
        }
    }
    Ok(())
}
