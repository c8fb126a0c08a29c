//! Command handlers
//!
//! Each handler loads what it needs through [`context::AppContext`] and
//! prints either human-readable views or one JSON object per line.

pub mod actions;
pub mod config;
pub mod context;
pub mod deploy;
pub mod import;
pub mod ip;
pub mod presets;
pub(crate) mod project_root;
pub mod session;
pub mod settings;
pub mod units;
