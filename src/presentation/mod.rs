//! Presentation Layer
//!
//! This layer handles:
//! - Creating the orchestrator with infrastructure dependencies
//! - Resolving configured paths against the project root
//!
//! ## Usage
//!
//! ```ignore
//! use fleet_deploy::presentation::factory;
//!
//! let config = fleet_deploy::config::load_layered(&root)?.config;
//! let orchestrator = factory::create_orchestrator(&root, &config)?;
//! ```

pub mod factory;

pub use factory::{create_orchestrator, ConcreteOrchestrator};
