//! Unit lifecycle status and the transition table that governs it

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

/// Lifecycle state of a unit within the deployment state machine
///
/// ```text
/// Pending ──▶ Queued ──▶ Running ──▶ Success
///    ▲          │           │
///    │          ▼           ▼
///    │       Skipped      Failed ──┐
///    └─────────────────────────────┘ (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    /// Known but not part of an active run
    #[default]
    Pending,
    /// Selected for the current run, waiting to execute
    Queued,
    /// Script invocation in flight
    Running,
    /// Script host reported success
    Success,
    /// Script host reported failure (or the run was cancelled mid-flight)
    Failed,
    /// Never executed because the run was cancelled or aborted
    Skipped,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 6] = [
        UnitStatus::Pending,
        UnitStatus::Queued,
        UnitStatus::Running,
        UnitStatus::Success,
        UnitStatus::Failed,
        UnitStatus::Skipped,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Terminal states for one run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Skipped)
    }

    /// Whether `self -> next` is an edge of the state machine.
    ///
    /// `Queued` is reachable from every state except `Running`, so a new run
    /// can re-queue units that finished (or were skipped) in an earlier one.
    pub fn can_transition_to(self, next: UnitStatus) -> bool {
        use UnitStatus::*;
        match (self, next) {
            (Running, Queued) | (Queued, Queued) => false,
            (_, Queued) => true,
            (Queued, Running) | (Queued, Skipped) => true,
            (Running, Success) | (Running, Failed) => true,
            (Failed, Pending) => true,
            _ => false,
        }
    }

    /// Validate a transition, returning the new state.
    pub fn transition(self, next: UnitStatus) -> FleetResult<UnitStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(FleetError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UnitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "QUEUED" => Ok(Self::Queued),
            "RUNNING" => Ok(Self::Running),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            "SKIPPED" => Ok(Self::Skipped),
            _ => Err(format!("unknown unit status: {s}")),
        }
    }
}
