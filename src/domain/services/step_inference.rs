//! Step inference from host log lines
//!
//! Annotation only: the inferred step is attached to events for display and
//! never feeds the lifecycle state machine.

use serde::Serialize;

use crate::domain::value_objects::{is_pseudo_unit, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeployStep {
    Downloading,
    #[serde(rename = "Updating Config")]
    UpdatingConfig,
    #[serde(rename = "Composing Services")]
    ComposingServices,
    Completed,
    Failed,
}

impl DeployStep {
    pub const fn label(&self) -> &'static str {
        match self {
            DeployStep::Downloading => "Downloading",
            DeployStep::UpdatingConfig => "Updating Config",
            DeployStep::ComposingServices => "Composing Services",
            DeployStep::Completed => "Completed",
            DeployStep::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for DeployStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Split a leading `[tag]` from a log line: `"[621001] text"` -> `(Some("621001"), "text")`
pub fn split_unit_tag(message: &str) -> (Option<&str>, &str) {
    let Some(rest) = message.strip_prefix('[') else {
        return (None, message);
    };
    match rest.split_once(']') {
        Some((tag, text)) if !tag.is_empty() => (Some(tag), text.trim_start()),
        _ => (None, message),
    }
}

/// Infer a display step from the text of a log line
pub fn infer_step(text: &str, level: LogLevel) -> Option<DeployStep> {
    let normalized = text.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));

    if normalized.contains("downloading") {
        Some(DeployStep::Downloading)
    } else if contains_any(&["updating unit config", "config updated", "patching unit.config"]) {
        Some(DeployStep::UpdatingConfig)
    } else if contains_any(&["docker compose", "starting docker", "compose"]) {
        Some(DeployStep::ComposingServices)
    } else if contains_any(&["deployment sequence completed", "process exited successfully"]) {
        Some(DeployStep::Completed)
    } else if level == LogLevel::Error {
        Some(DeployStep::Failed)
    } else {
        None
    }
}

/// Attribute and classify one host line.
///
/// The `[tag]` names the unit, else `fallback_unit` does. Lines attributed to
/// a pseudo-unit carry no step.
pub fn annotate<'a>(
    message: &'a str,
    level: LogLevel,
    fallback_unit: &'a str,
) -> (&'a str, Option<DeployStep>) {
    let (tag, text) = split_unit_tag(message);
    let unit = tag.unwrap_or(fallback_unit);
    if is_pseudo_unit(unit) {
        (unit, None)
    } else {
        (unit, infer_step(text, level))
    }
}
