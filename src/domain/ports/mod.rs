//! Domain ports
//!
//! Narrow interfaces to the external, fallible collaborators.

pub mod config_file_store;
pub mod run_events;
pub mod script_host;
pub mod session_store;
pub mod settings_store;
pub mod unit_extractor;

pub use config_file_store::{ConfigFileStore, FileStoreError};
pub use run_events::{NoopEventSink, RunEvent, RunEventSink};
pub use script_host::{
    ExecOutcome, HostError, HostLogLine, ScriptHost, ScriptInvocation, StopOutcome,
};
pub use session_store::{RunClaim, SessionStore, StoreError};
pub use settings_store::{SettingsEntry, SettingsError, SettingsStore};
pub use unit_extractor::{dedupe_extracted, ExtractedUnit, UnitExtractor};
