//! JSON Event Sink
//!
//! Outputs run events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{RunEvent, RunEventSink};

/// Event sink that outputs one JSON object per line
pub struct JsonEventSink {
    /// Command name stamped on every event
    command: &'static str,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            command,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn completion_status(failed: usize, skipped: usize, cancelled: bool) -> &'static str {
    if cancelled {
        "cancelled"
    } else if failed == 0 && skipped == 0 {
        "success"
    } else {
        "partial"
    }
}

impl RunEventSink for JsonEventSink {
    fn on_event(&self, event: RunEvent) {
        let command = self.command;
        let json = match event {
            RunEvent::RunStarted {
                mode,
                script,
                unit_ids,
            } => serde_json::json!({
                "event": "run_start",
                "command": command,
                "mode": mode.as_str(),
                "script": script,
                "units": unit_ids,
            }),

            RunEvent::UnitStatusChanged { unit_id, from, to } => serde_json::json!({
                "event": "unit_status",
                "command": command,
                "unit": unit_id,
                "from": from.as_str(),
                "to": to.as_str(),
            }),

            RunEvent::Log {
                unit,
                message,
                level,
                step,
            } => serde_json::json!({
                "event": "log",
                "command": command,
                "unit": unit,
                "level": level.as_str(),
                "message": message,
                "step": step.map(|s| s.label()),
            }),

            RunEvent::TemplateLearned {
                group,
                source_unit_id,
                created,
            } => serde_json::json!({
                "event": "template_learned",
                "command": command,
                "group": group,
                "source_unit": source_unit_id,
                "created": created,
            }),

            RunEvent::SystemError { message } => serde_json::json!({
                "event": "error",
                "command": command,
                "message": message,
            }),

            RunEvent::RunCompleted {
                succeeded,
                failed,
                skipped,
                cancelled,
            } => serde_json::json!({
                "event": "complete",
                "command": command,
                "status": completion_status(failed, skipped, cancelled),
                "succeeded": succeeded,
                "failed": failed,
                "skipped": skipped,
                "cancelled": cancelled,
            }),

            RunEvent::ActionStarted {
                action_id,
                label,
                unit_ids,
            } => serde_json::json!({
                "event": "action_start",
                "command": command,
                "action": action_id,
                "label": label,
                "units": unit_ids,
            }),

            RunEvent::ActionCompleted { action_id, success } => serde_json::json!({
                "event": "action_complete",
                "command": command,
                "action": action_id,
                "success": success,
            }),
        };

        self.write_event(json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::DeployStep;
    use crate::domain::value_objects::{LogLevel, RunMode, UnitStatus};
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn json_sink_event_stream_shape() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("deploy", writer);

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
        sink.on_event(RunEvent::Log {
            unit: "621001".to_string(),
            message: "Downloading package".to_string(),
            level: LogLevel::Info,
            step: Some(DeployStep::Downloading),
        });
        sink.on_event(RunEvent::RunCompleted {
            succeeded: 1,
            failed: 0,
            skipped: 0,
            cancelled: false,
        });

        insta::assert_snapshot!(output(&buffer).trim_end(), @r#"
        {"command":"deploy","event":"run_start","mode":"sequential","script":"./scripts/Deploy-UpdatedUnits.ps1","units":["621001"]}
        {"command":"deploy","event":"unit_status","from":"QUEUED","to":"RUNNING","unit":"621001"}
        {"command":"deploy","event":"log","level":"INFO","message":"Downloading package","step":"Downloading","unit":"621001"}
        {"cancelled":false,"command":"deploy","event":"complete","failed":0,"skipped":0,"status":"success","succeeded":1}
        "#);
    }

    #[test]
    fn json_sink_outputs_partial_on_failures() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("deploy", writer);

        sink.on_event(RunEvent::RunCompleted {
            succeeded: 1,
            failed: 1,
            skipped: 1,
            cancelled: false,
        });

        assert!(output(&buffer).contains("\"status\":\"partial\""));
    }

    #[test]
    fn json_sink_outputs_cancelled_status() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("deploy", writer);

        sink.on_event(RunEvent::RunCompleted {
            succeeded: 0,
            failed: 1,
            skipped: 2,
            cancelled: true,
        });

        assert!(output(&buffer).contains("\"status\":\"cancelled\""));
    }

    #[test]
    fn json_sink_action_events() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("run-action", writer);

        sink.on_event(RunEvent::ActionStarted {
            action_id: "download".to_string(),
            label: "Download Package".to_string(),
            unit_ids: vec!["621001".to_string(), "621002".to_string()],
        });
        sink.on_event(RunEvent::ActionCompleted {
            action_id: "download".to_string(),
            success: false,
        });

        let out = output(&buffer);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["event"], "action_start");
        assert_eq!(lines[0]["units"][1], "621002");
        assert_eq!(lines[1]["success"], false);
        assert_eq!(lines[1]["command"], "run-action");
    }
}
