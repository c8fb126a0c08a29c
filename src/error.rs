//! Error types for fleet-deploy
//!
//! Library errors are `thiserror` enums; the binary wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::config_file_store::FileStoreError;
use crate::domain::ports::session_store::StoreError;
use crate::domain::ports::settings_store::SettingsError;
use crate::domain::value_objects::UnitStatus;

/// Result type alias for fleet operations
pub type FleetResult<T> = Result<T, FleetError>;

/// Main error type for fleet operations
#[derive(Error, Debug)]
pub enum FleetError {
    /// Input rejected before any state was touched
    #[error("validation failed: {0}")]
    Validation(String),

    /// A config file could not be merged; the file is left unmodified
    #[error("malformed config '{identity}': {message}")]
    MalformedConfig { identity: String, message: String },

    /// The script host failed for one unit
    #[error("script host error: {0}")]
    ExternalHost(String),

    /// Another run or script action is active
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// Orchestrator-level failure that aborts the whole run
    #[error("system error: {0}")]
    System(String),

    /// Status change that is not an edge of the lifecycle state machine
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: UnitStatus, to: UnitStatus },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file
    #[error("config error in {file}: {message}")]
    Config { file: PathBuf, message: String },

    #[error(transparent)]
    Session(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Files(#[from] FileStoreError),
}

impl FleetError {
    pub fn validation(message: impl Into<String>) -> Self {
        FleetError::Validation(message.into())
    }

    pub fn system(message: impl Into<String>) -> Self {
        FleetError::System(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_config() {
        let err = FleetError::MalformedConfig {
            identity: "621696/app/unit.config".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed config '621696/app/unit.config': expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = FleetError::Config {
            file: PathBuf::from("fleet.toml"),
            message: "invalid type".to_string(),
        };
        assert_eq!(err.to_string(), "config error in fleet.toml: invalid type");
    }

    #[test]
    fn test_store_errors_are_transparent() {
        let err: FleetError = StoreError::Corrupted {
            path: PathBuf::from("session.json"),
            message: "EOF".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "session file corrupted: session.json (EOF)");
    }
}
