//! Script Host Implementations

mod process;

pub use process::ProcessScriptHost;
