//! Preset entity - a named, ordered selection of units

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub ids: Vec<String>,
}

impl Preset {
    /// Build a preset; the name is trimmed and must not be blank, and at least
    /// one unit is required.
    pub fn new(name: &str, ids: Vec<String>) -> FleetResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FleetError::validation("preset name is required"));
        }
        if ids.is_empty() {
            return Err(FleetError::validation(
                "select at least one unit for the preset",
            ));
        }
        let mut unique: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Ok(Self {
            name: name.to_string(),
            ids: unique,
        })
    }

    /// Name used for presets generated from a group
    pub fn group_preset_name(group: &str) -> String {
        format!("{} Group", group.trim())
    }
}
