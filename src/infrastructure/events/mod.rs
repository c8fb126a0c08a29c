//! Event Sink Implementations
//!
//! Machine-readable implementation of RunEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! The human-readable console sink lives with the CLI views.

mod json;

pub use json::JsonEventSink;
