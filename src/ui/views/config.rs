//! Views for per-unit configuration, templates and history

use std::collections::BTreeMap;

use fleet_deploy::application::ConfigPreview;
use fleet_deploy::domain::entities::{FileRef, GroupTemplate, HistoryEntry};
use fleet_deploy::domain::services::EffectiveIps;
use fleet_deploy::domain::value_objects::IpRole;

use crate::ui::context::UiContext;
use crate::ui::diff::render_config_diff;
use crate::ui::theme::{self, colors, icons, icons_ascii};
use crate::ui::views::table::Table;

pub fn render_effective_ips(unit_id: &str, ips: &EffectiveIps, ui: &UiContext) -> String {
    let mut table = Table::new(["ROLE", "KEY", "VALUE"]);
    for role in IpRole::ALL {
        let value = match ips.get(role) {
            Some(value) => value.to_string(),
            None => theme::paint("(unset)", colors::DIM, ui.color),
        };
        table.row(vec![
            role.display_name().to_string(),
            role.settings_key().to_string(),
            value,
        ]);
    }
    format!("Effective IPs for {unit_id}\n{}", table.render())
}

pub fn render_files(unit_id: &str, files: &[FileRef]) -> String {
    if files.is_empty() {
        return format!("No editable files staged for {unit_id}.\n");
    }
    let mut out = String::new();
    for file in files {
        out.push_str(&file.identity);
        out.push('\n');
    }
    out
}

/// One block per config file: its state, the keys overrides touch, and
/// optionally the diff against what is on disk.
pub fn render_previews(previews: &[ConfigPreview], with_diff: bool, ui: &UiContext) -> String {
    if previews.is_empty() {
        return "No unit.config files found.\n".to_string();
    }

    let (ok, warn, err) = if ui.unicode {
        (icons::SUCCESS, icons::WARNING, icons::ERROR)
    } else {
        (icons_ascii::SUCCESS, icons_ascii::WARNING, icons_ascii::ERROR)
    };

    let mut out = String::new();
    for preview in previews {
        let header = if let Some(error) = &preview.error {
            theme::paint(
                &format!("{err} {} ({error})", preview.identity),
                colors::ERROR,
                ui.color,
            )
        } else if preview.is_changed() {
            theme::paint(
                &format!(
                    "{warn} {} ({})",
                    preview.identity,
                    preview.diff().summary()
                ),
                colors::WARNING,
                ui.color,
            )
        } else {
            theme::paint(
                &format!("{ok} {} (up to date)", preview.identity),
                colors::SUCCESS,
                ui.color,
            )
        };
        out.push_str(&header);
        out.push('\n');

        if !preview.applied_keys.is_empty() {
            out.push_str(&format!("  keys: {}\n", preview.applied_keys.join(", ")));
        }
        if !preview.changed_keys.is_empty() {
            out.push_str(&format!("  changed: {}\n", preview.changed_keys.join(", ")));
        }
        if with_diff && preview.is_changed() {
            out.push_str(&render_config_diff(&preview.identity, &preview.diff(), ui.color));
        }
    }
    out
}

pub fn render_templates(templates: &BTreeMap<String, GroupTemplate>) -> String {
    if templates.is_empty() {
        return "No group templates learned yet.\n".to_string();
    }
    let mut table = Table::new(["GROUP", "SOURCE UNIT", "FILES", "UPDATED"]);
    for (group, template) in templates {
        table.row(vec![
            group.clone(),
            template.source_unit_id.clone(),
            template.config_overrides.len().to_string(),
            template.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table.render()
}

pub fn render_history(history: &BTreeMap<String, HistoryEntry>, ui: &UiContext) -> String {
    if history.is_empty() {
        return "No deployments recorded.\n".to_string();
    }
    let mut table = Table::new(["UNIT", "LAST STATUS", "LAST RUN"]);
    for (unit, entry) in history {
        table.row(vec![
            unit.clone(),
            theme::paint(
                entry.last_status.as_str(),
                theme::status_color(entry.last_status),
                ui.color,
            ),
            entry.last_run.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table.render()
}
