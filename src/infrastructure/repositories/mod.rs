//! Repository Implementations
//!
//! File-backed implementations of the settings and session ports.

mod env_settings;
mod session;

pub use env_settings::EnvSettingsStore;
pub use session::JsonSessionStore;
