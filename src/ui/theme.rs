use crossterm::style::{Color, Stylize};

use fleet_deploy::domain::value_objects::{LogLevel, UnitStatus};

/// Design tokens for the CLI.
///
/// Only 5 semantic colors; icons come from `icons` / `icons_ascii`.
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const PENDING: &str = "○";
    pub const SKIPPED: &str = "⊘";
    pub const ARROW: &str = "↳";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const PENDING: &str = "[ ]";
    pub const SKIPPED: &str = "[SKIP]";
    pub const ARROW: &str = "->";
}

/// Wrap `text` in `color` when color output is on
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

pub fn status_color(status: UnitStatus) -> Color {
    match status {
        UnitStatus::Success => colors::SUCCESS,
        UnitStatus::Failed => colors::ERROR,
        UnitStatus::Running | UnitStatus::Queued => colors::INFO,
        UnitStatus::Skipped => colors::WARNING,
        UnitStatus::Pending => colors::DIM,
    }
}

pub fn status_icon(status: UnitStatus, unicode: bool) -> &'static str {
    match (unicode, status) {
        (true, UnitStatus::Success) => icons::SUCCESS,
        (true, UnitStatus::Failed) => icons::ERROR,
        (true, UnitStatus::Running) => icons::PROGRESS,
        (true, UnitStatus::Skipped) => icons::SKIPPED,
        (true, UnitStatus::Pending | UnitStatus::Queued) => icons::PENDING,
        (false, UnitStatus::Success) => icons_ascii::SUCCESS,
        (false, UnitStatus::Failed) => icons_ascii::ERROR,
        (false, UnitStatus::Running) => icons_ascii::PROGRESS,
        (false, UnitStatus::Skipped) => icons_ascii::SKIPPED,
        (false, UnitStatus::Pending | UnitStatus::Queued) => icons_ascii::PENDING,
    }
}

pub fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => colors::DIM,
        LogLevel::Success => colors::SUCCESS,
        LogLevel::Warning => colors::WARNING,
        LogLevel::Error => colors::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_is_plain_without_color() {
        assert_eq!(paint("ok", colors::SUCCESS, false), "ok");
    }

    #[test]
    fn ascii_status_icons() {
        assert_eq!(status_icon(UnitStatus::Failed, false), "[FAIL]");
        assert_eq!(status_icon(UnitStatus::Queued, true), "○");
    }
}
