//! Orchestrator Results
//!
//! Reports returned by runs, script actions and session operations.

use std::path::PathBuf;

use crate::domain::services::ConfigDiff;
use crate::domain::value_objects::{RunMode, UnitStatus};

/// Final status of one unit in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    pub unit_id: String,
    pub status: UnitStatus,
}

/// Result of a deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: RunMode,
    /// One entry per selected unit, in selection order
    pub outcomes: Vec<UnitOutcome>,
    /// Cancellation was observed during the run
    pub cancelled: bool,
    /// A failure stopped the sequence (continue-on-failure was off)
    pub aborted: bool,
    /// Groups whose template changed during the run
    pub templates_learned: Vec<String>,
}

impl RunReport {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
            cancelled: false,
            aborted: false,
            templates_learned: Vec::new(),
        }
    }

    fn count(&self, status: UnitStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(UnitStatus::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(UnitStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(UnitStatus::Skipped)
    }

    pub fn status_of(&self, unit_id: &str) -> Option<UnitStatus> {
        self.outcomes
            .iter()
            .find(|o| o.unit_id == unit_id)
            .map(|o| o.status)
    }

    pub fn is_success(&self) -> bool {
        !self.outcomes.is_empty() && self.succeeded() == self.outcomes.len()
    }
}

/// Result of an ad-hoc script action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action_id: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// Result of adding units from manual input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: Vec<String>,
    pub already_registered: Vec<String>,
    pub invalid: Vec<String>,
}

/// Result of importing units from the extraction service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Distinct IDs the extractor reported
    pub detected: usize,
    pub added: Vec<String>,
    pub already_registered: Vec<String>,
    /// Reported IDs that are not valid unit IDs
    pub invalid: Vec<String>,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.detected == 0
    }
}

/// A unit config file next to what layer resolution would make of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPreview {
    pub identity: String,
    pub path: PathBuf,
    pub current: String,
    pub resolved: String,
    /// Override keys that apply to this file
    pub applied_keys: Vec<String>,
    /// Applied keys whose value differs from the file on disk
    pub changed_keys: Vec<String>,
    /// Set when the file is not a JSON object; `resolved` is then `current`
    pub error: Option<String>,
}

impl ConfigPreview {
    pub fn is_changed(&self) -> bool {
        self.error.is_none() && self.current != self.resolved
    }

    pub fn diff(&self) -> ConfigDiff {
        ConfigDiff::between(&self.current, &self.resolved)
    }
}
