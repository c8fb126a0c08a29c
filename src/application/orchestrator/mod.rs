//! Fleet Orchestrator
//!
//! Owns the fleet session and drives deployments, script actions and the
//! session, settings and configuration operations around them.

mod cancel;
mod config_ops;
mod options;
mod result;
mod session_ops;
mod use_case;


pub use cancel::CancelHandle;
pub use options::{OrchestratorOptions, RunOptions};
pub use result::{
    ActionReport, AddReport, ConfigPreview, ImportReport, RunReport, UnitOutcome,
};
pub use use_case::FleetOrchestrator;
