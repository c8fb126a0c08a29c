//! Session log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pseudo-unit for orchestrator-level messages
pub const SYSTEM_UNIT: &str = "SYSTEM";
/// Pseudo-unit for batch-mode messages
pub const BATCH_UNIT: &str = "BATCH";
/// Pseudo-unit for ad-hoc script actions
pub const SCRIPT_UNIT: &str = "SCRIPT";

/// Whether `unit` names a pseudo-unit rather than a real unit
pub fn is_pseudo_unit(unit: &str) -> bool {
    matches!(unit, SYSTEM_UNIT | BATCH_UNIT | SCRIPT_UNIT)
}

/// Maximum entries kept when a session is persisted
pub const MAX_PERSISTED_LOGS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the session log, attributed to a unit or a pseudo-unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub unit: String,
    pub message: String,
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(unit: impl Into<String>, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: Utc::now(),
            unit: unit.into(),
            message: message.into(),
            level,
        }
    }

    pub fn info(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(unit, message, LogLevel::Info)
    }

    pub fn success(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(unit, message, LogLevel::Success)
    }

    pub fn warning(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(unit, message, LogLevel::Warning)
    }

    pub fn error(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(unit, message, LogLevel::Error)
    }

    /// `[timestamp] [LEVEL] [unit] message`, the format used by log exports
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.level,
            self.unit,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn render_includes_all_fields() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            unit: SYSTEM_UNIT.to_string(),
            message: "Execution finished.".to_string(),
            level: LogLevel::Info,
        };
        assert_eq!(
            entry.render(),
            "[2024-03-01T12:00:00.000Z] [INFO] [SYSTEM] Execution finished."
        );
    }

    #[test]
    fn pseudo_units_are_recognised() {
        assert!(is_pseudo_unit("BATCH"));
        assert!(!is_pseudo_unit("621001"));
    }

    #[test]
    fn level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "\"WARNING\"");
    }
}
