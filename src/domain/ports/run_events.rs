//! Run Event Port
//!
//! Observable interface for deployment runs and script actions.
//! Drives console progress, NDJSON event streams and tests.

use crate::domain::services::step_inference::DeployStep;
use crate::domain::value_objects::{LogLevel, RunMode, UnitStatus};

/// Event emitted while a run or script action executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Run accepted; every selected unit is now `Queued`
    RunStarted {
        mode: RunMode,
        script: String,
        unit_ids: Vec<String>,
    },

    /// A unit moved along a lifecycle edge
    UnitStatusChanged {
        unit_id: String,
        from: UnitStatus,
        to: UnitStatus,
    },

    /// Log line attributed to a unit or a pseudo-unit
    Log {
        unit: String,
        message: String,
        level: LogLevel,
        /// Display step inferred from a `[unitId]`-tagged host line
        step: Option<DeployStep>,
    },

    /// A group template was created or replaced
    TemplateLearned {
        group: String,
        source_unit_id: String,
        created: bool,
    },

    /// Orchestrator-level failure that aborted the run
    SystemError { message: String },

    /// Run finished (normally, by cancellation or by abort)
    RunCompleted {
        succeeded: usize,
        failed: usize,
        skipped: usize,
        cancelled: bool,
    },

    /// Ad-hoc script action started
    ActionStarted {
        action_id: String,
        label: String,
        unit_ids: Vec<String>,
    },

    /// Ad-hoc script action finished
    ActionCompleted { action_id: String, success: bool },
}

/// Trait for receiving run events
///
/// Implementations:
/// - ConsoleEventSink: human-readable progress
/// - JsonEventSink: NDJSON stream for automation
/// - NoopEventSink: silent operation
pub trait RunEventSink: Send + Sync {
    fn on_event(&self, event: RunEvent);

    /// Whether this sink wants raw host output lines
    ///
    /// Summary-only sinks skip per-line `Log` events from the script host.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl RunEventSink for NoopEventSink {
    fn on_event(&self, _event: RunEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<RunEvent>>>,
    }

    impl RunEventSink for RecordingEventSink {
        fn on_event(&self, event: RunEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(RunEvent::RunStarted {
            mode: RunMode::Sequential,
            script: "./scripts/Deploy-UpdatedUnits.ps1".to_string(),
            unit_ids: vec!["621001".to_string()],
        });
        sink.on_event(RunEvent::UnitStatusChanged {
            unit_id: "621001".to_string(),
            from: UnitStatus::Queued,
            to: UnitStatus::Running,
        });

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RunEvent::RunStarted { .. }));
        assert!(sink.wants_detailed_events());
    }

    #[test]
    fn noop_sink_does_not_want_details() {
        let sink = NoopEventSink;
        sink.on_event(RunEvent::SystemError {
            message: "ignored".to_string(),
        });
        assert!(!sink.wants_detailed_events());
    }
}
