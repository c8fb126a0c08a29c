//! Console progress for deployment runs and script actions

use fleet_deploy::domain::ports::{RunEvent, RunEventSink};
use fleet_deploy::domain::value_objects::UnitStatus;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::context::UiContext;
use crate::ui::theme::{self, colors, icons, icons_ascii};

/// Human-readable sink printing one line per event
pub struct ConsoleRunSink {
    ui: UiContext,
}

impl ConsoleRunSink {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl RunEventSink for ConsoleRunSink {
    fn on_event(&self, event: RunEvent) {
        if let Some(line) = render_event(&event, &self.ui) {
            println!("{line}");
        }
    }
}

pub fn render_event(event: &RunEvent, ui: &UiContext) -> Option<String> {
    let color = ui.color;
    let arrow = if ui.unicode { icons::ARROW } else { icons_ascii::ARROW };

    match event {
        RunEvent::RunStarted {
            mode,
            script,
            unit_ids,
        } => Some(theme::paint(
            &format!(
                "Deploying {} unit(s) [{mode}] via {script}",
                unit_ids.len()
            ),
            colors::INFO,
            color,
        )),

        RunEvent::UnitStatusChanged { unit_id, to, .. } => {
            if *to == UnitStatus::Queued && ui.verbose == 0 {
                return None;
            }
            let icon = theme::status_icon(*to, ui.unicode);
            Some(format!(
                "{} {unit_id} {}",
                theme::paint(icon, theme::status_color(*to), color),
                theme::paint(to.as_str(), theme::status_color(*to), color)
            ))
        }

        RunEvent::Log {
            unit,
            message,
            level,
            step,
        } => {
            let step = step
                .map(|s| format!(" ({})", s.label()))
                .unwrap_or_default();
            let mut line = format!("  [{unit}] {message}{step}");
            if ui.caps.is_tty {
                line = clip(&line, usize::from(ui.caps.width), ui.unicode);
            }
            Some(theme::paint(
                &line,
                theme::level_color(*level),
                color,
            ))
        }

        RunEvent::TemplateLearned {
            group,
            source_unit_id,
            created,
        } => {
            let verb = if *created { "created" } else { "updated" };
            Some(theme::paint(
                &format!("{arrow} Template for {group} {verb} from {source_unit_id}"),
                colors::INFO,
                color,
            ))
        }

        RunEvent::SystemError { message } => {
            let icon = if ui.unicode { icons::ERROR } else { icons_ascii::ERROR };
            Some(theme::paint(&format!("{icon} {message}"), colors::ERROR, color))
        }

        RunEvent::RunCompleted {
            succeeded,
            failed,
            skipped,
            cancelled,
        } => {
            let mut text = format!("Done: {succeeded} succeeded, {failed} failed, {skipped} skipped");
            if *cancelled {
                text.push_str(" (cancelled)");
            }
            let tone = if *failed == 0 && *skipped == 0 && !*cancelled {
                colors::SUCCESS
            } else {
                colors::WARNING
            };
            Some(theme::paint(&text, tone, color))
        }

        RunEvent::ActionStarted {
            label, unit_ids, ..
        } => {
            let scope = if unit_ids.is_empty() {
                String::new()
            } else {
                format!(" for {}", unit_ids.join(", "))
            };
            Some(theme::paint(&format!("Running {label}{scope}"), colors::INFO, color))
        }

        RunEvent::ActionCompleted { action_id, success } => {
            let (icon, tone) = match (*success, ui.unicode) {
                (true, true) => (icons::SUCCESS, colors::SUCCESS),
                (true, false) => (icons_ascii::SUCCESS, colors::SUCCESS),
                (false, true) => (icons::ERROR, colors::ERROR),
                (false, false) => (icons_ascii::ERROR, colors::ERROR),
            };
            Some(theme::paint(&format!("{icon} {action_id}"), tone, color))
        }
    }
}

/// Cut `text` to `max` display columns, marking the cut
fn clip(text: &str, max: usize, unicode: bool) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let marker = if unicode { "…" } else { "..." };
    let budget = max.saturating_sub(marker.width());
    let mut used = 0;
    let mut out = String::with_capacity(max);
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(marker);
    out
}
