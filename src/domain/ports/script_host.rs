//! Script host port
//!
//! The external process that performs file transfer and service restarts on
//! a unit. The orchestrator only sees a binary outcome and a stream of log lines.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::LogLevel;

/// One script invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub script: String,
    pub args: Vec<String>,
    /// Extra environment for the child; later pairs win over earlier ones
    pub env: Vec<(String, String)>,
}

impl ScriptInvocation {
    pub fn new(script: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            script: script.into(),
            args,
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Value the child will see for `key`
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A log line produced by the host while a script runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLogLine {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
}

impl HostLogLine {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            level,
        }
    }
}

/// Binary result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl ExecOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
        }
    }

    pub fn failure(exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Result of asking the host to stop the in-flight process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// This invocation failed to run; counts as a unit failure
    #[error("script invocation failed: {0}")]
    Invocation(String),

    /// The host itself cannot be reached; aborts the run
    #[error("script host unavailable: {0}")]
    Unavailable(String),
}

pub trait ScriptHost: Send + Sync {
    /// Run a script to completion, delivering log lines through `on_log` as they arrive.
    fn execute(
        &self,
        invocation: &ScriptInvocation,
        on_log: &(dyn Fn(HostLogLine) + Sync),
    ) -> Result<ExecOutcome, HostError>;

    /// Stop the in-flight process, if any
    fn stop(&self) -> StopOutcome;
}
