//! Group template entity

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field overrides for one config file
pub type FieldOverrides = Map<String, Value>;

/// Field overrides keyed by config file identity
pub type FileOverrides = BTreeMap<String, FieldOverrides>;

/// Reusable per-group configuration learned from a successful deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTemplate {
    pub source_unit_id: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub config_overrides: FileOverrides,
}

impl GroupTemplate {
    pub fn new(source_unit_id: impl Into<String>, config_overrides: FileOverrides) -> Self {
        Self {
            source_unit_id: source_unit_id.into(),
            updated_at: Utc::now(),
            config_overrides,
        }
    }

    /// Overrides this template contributes for one file
    pub fn overrides_for(&self, identity: &str) -> Option<&FieldOverrides> {
        self.config_overrides.get(identity)
    }
}

/// Canonical serialization of a set of file overrides.
///
/// Keys are ordered at every level, so two override sets with the same
/// content always serialize to the same bytes.
pub fn canonical_json(overrides: &FileOverrides) -> String {
    serde_json::to_string(overrides).unwrap_or_default()
}
