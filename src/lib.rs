//! fleet-deploy - deployment orchestration for a fleet of field units
//!
//! Keeps a registry of units, drives an external deployment script over the
//! selected ones (one at a time or as one batch), tracks every unit through a
//! strict lifecycle and resolves per-unit configuration from group templates,
//! explicit overrides and default IP settings.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    CancelHandle, FleetOrchestrator, OrchestratorOptions, RunOptions, RunReport, UnitOutcome,
};
pub use config::Config;
pub use domain::entities::{FleetSession, Unit};
pub use domain::value_objects::{RunMode, UnitStatus};
pub use error::{FleetError, FleetResult};
