//! Application Layer
//!
//! Use cases that coordinate the domain with the outside world.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Owns the single mutable session and the run lifecycle
//!
//! ## Use Cases
//!
//! - `FleetOrchestrator` - deployment runs, script actions, unit registry,
//!   presets, review, settings and per-unit configuration

pub mod orchestrator;

pub use orchestrator::{
    ActionReport, AddReport, CancelHandle, ConfigPreview, FleetOrchestrator, ImportReport,
    OrchestratorOptions, RunOptions, RunReport, UnitOutcome,
};
