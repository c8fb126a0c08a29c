//! Settings store port
//!
//! Flat key/value settings. The reserved secret (`PAT`) is never returned by
//! reads and is preserved untouched by every writer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::FileOverrides;
use crate::domain::services::settings_view::SettingsSnapshot;
use crate::domain::value_objects::IpOverrides;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsEntry {
    pub key: String,
    pub value: String,
}

impl SettingsEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize settings: {message}")]
    Serialization { message: String },

    #[error("'{key}' is reserved and cannot be written here")]
    ReservedKey { key: String },
}

pub trait SettingsStore: Send + Sync {
    /// All entries except the secret
    fn read_entries(&self) -> Result<Vec<SettingsEntry>, SettingsError>;

    /// Whether the secret is present
    fn has_secret(&self) -> Result<bool, SettingsError>;

    /// Replace general entries. Existing `UNIT_*` keys and the secret survive.
    fn write_entries(&self, entries: &[SettingsEntry]) -> Result<(), SettingsError>;

    /// Replace one unit's IP override keys
    fn write_unit_overrides(
        &self,
        unit_id: &str,
        overrides: &IpOverrides,
    ) -> Result<(), SettingsError>;

    /// Replace (or remove, when empty) one unit's explicit file overrides
    fn write_unit_config_overrides(
        &self,
        unit_id: &str,
        overrides: &FileOverrides,
    ) -> Result<(), SettingsError>;

    fn snapshot(&self) -> Result<SettingsSnapshot, SettingsError> {
        let entries = self.read_entries()?;
        Ok(SettingsSnapshot::from_entries(
            entries.into_iter().map(|e| (e.key, e.value)),
            self.has_secret()?,
        ))
    }
}
