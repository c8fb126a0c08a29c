//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `host/` - Script host running deployment scripts as child processes
//! - `staging/` - Config file store over the per-unit staging tree
//! - `repositories/` - `.env` settings and JSON session persistence
//! - `events/` - NDJSON run event sink
//! - `extraction/` - Unit extractor over saved vision-service responses
//! - `fs/` - Atomic writes and `.env` parsing

pub mod events;
pub mod extraction;
pub mod fs;
pub mod host;
pub mod repositories;
pub mod staging;

// Re-export for convenience
pub use events::JsonEventSink;
pub use extraction::JsonResponseExtractor;
pub use host::ProcessScriptHost;
pub use repositories::{EnvSettingsStore, JsonSessionStore};
pub use staging::StagingConfigStore;
