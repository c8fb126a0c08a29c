use fleet_deploy::domain::entities::{FleetSession, Preset, UnitSource};
use fleet_deploy::domain::value_objects::UnitStatus;

use crate::ui::context::UiContext;
use crate::ui::theme::{self, colors};
use crate::ui::views::table::Table;

fn source_label(source: UnitSource) -> &'static str {
    match source {
        UnitSource::Manual => "manual",
        UnitSource::Extracted => "extracted",
    }
}

/// Registry table in insertion order
pub fn render_units(session: &FleetSession, ui: &UiContext) -> String {
    if session.units.is_empty() {
        return "No units registered.\n".to_string();
    }

    let review: Vec<&str> = session.review_candidates().iter().map(|u| u.id()).collect();
    let mut table = Table::new(["ID", "GROUP", "STATUS", "SOURCE", "SELECTED", "REVIEW"]);
    for unit in session.units.iter() {
        let status = unit.status();
        let status_cell = theme::paint(
            &format!(
                "{} {}",
                theme::status_icon(status, ui.unicode),
                status.as_str()
            ),
            theme::status_color(status),
            ui.color,
        );
        table.row(vec![
            unit.id().to_string(),
            unit.normalized_group(),
            status_cell,
            source_label(unit.source()).to_string(),
            if session.is_selected(unit.id()) { "yes" } else { "" }.to_string(),
            if review.contains(&unit.id()) {
                theme::paint("needed", colors::WARNING, ui.color)
            } else {
                String::new()
            },
        ]);
    }

    let counts = session.units.status_counts();
    let breakdown: Vec<String> = UnitStatus::ALL
        .iter()
        .filter(|status| counts.get(**status) > 0)
        .map(|status| {
            format!(
                "{} {}",
                counts.get(*status),
                status.as_str().to_ascii_lowercase()
            )
        })
        .collect();

    let mut out = table.render();
    out.push_str(&format!(
        "\n{} unit(s), {} selected: {}\n",
        counts.total(),
        session.selected.len(),
        breakdown.join(", ")
    ));
    out
}

/// Extracted units awaiting review, with the reason each one is listed
pub fn render_review(session: &FleetSession, ui: &UiContext) -> String {
    let candidates = session.review_candidates();
    if candidates.is_empty() {
        return "No units need review.\n".to_string();
    }

    let mut table = Table::new(["ID", "GROUP", "CONFIDENCE"]);
    for unit in candidates {
        let group = if unit.group().is_some() {
            unit.normalized_group()
        } else {
            theme::paint(&unit.normalized_group(), colors::WARNING, ui.color)
        };
        table.row(vec![
            unit.id().to_string(),
            group,
            unit.confidence()
                .map(|c| format!("{c}%"))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.render()
}

pub fn render_presets(presets: &[Preset]) -> String {
    if presets.is_empty() {
        return "No presets saved.\n".to_string();
    }
    let mut table = Table::new(["NAME", "UNITS"]);
    for preset in presets {
        table.row(vec![preset.name.clone(), preset.ids.join(", ")]);
    }
    table.render()
}
