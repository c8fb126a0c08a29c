//! Fleet session entity
//!
//! The single owned state object: registry, selection, presets, history,
//! learned templates, the session log and the verified set.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::preset::Preset;
use crate::domain::entities::registry::UnitRegistry;
use crate::domain::entities::template::GroupTemplate;
use crate::domain::entities::unit::{Unit, UnitSource};
use crate::domain::value_objects::group::is_unassigned;
use crate::domain::value_objects::log_entry::MAX_PERSISTED_LOGS;
use crate::domain::value_objects::{LogEntry, UnitStatus};
use crate::error::{FleetError, FleetResult};

/// Extracted units below this confidence need human review
pub const REVIEW_CONFIDENCE_THRESHOLD: u8 = 90;

/// Last terminal outcome recorded for a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub last_status: UnitStatus,
    pub last_run: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetSession {
    pub units: UnitRegistry,
    pub selected: Vec<String>,
    pub presets: Vec<Preset>,
    pub history: BTreeMap<String, HistoryEntry>,
    pub templates: BTreeMap<String, GroupTemplate>,
    pub logs: Vec<LogEntry>,
    pub verified: BTreeSet<String>,
}

impl FleetSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Replace the selection. Unknown and repeated IDs are dropped.
    pub fn set_selection(&mut self, ids: &[String]) -> Vec<String> {
        let mut next: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.units.contains(id) && !next.contains(id) {
                next.push(id.clone());
            }
        }
        self.selected = next.clone();
        next
    }

    pub fn add_to_selection(&mut self, id: &str) {
        if self.units.contains(id) && !self.is_selected(id) {
            self.selected.push(id.to_string());
        }
    }

    /// Register a unit. Manual additions join the selection; extracted ones never do.
    pub fn add_unit(&mut self, unit: Unit) -> FleetResult<()> {
        let id = unit.id().to_string();
        let manual = unit.source() == UnitSource::Manual;
        self.units.insert(unit)?;
        if manual {
            self.add_to_selection(&id);
        }
        Ok(())
    }

    /// Remove units along with their selection and verification marks.
    pub fn remove_units(&mut self, ids: &[String]) -> usize {
        let removed = ids
            .iter()
            .filter(|id| self.units.remove(id).is_some())
            .count();
        self.selected.retain(|id| !ids.contains(id));
        self.verified.retain(|id| !ids.contains(id));
        removed
    }

    /// Record a terminal outcome when it differs from the last one recorded.
    pub fn record_history(&mut self, id: &str, status: UnitStatus, at: DateTime<Utc>) -> bool {
        if !status.is_terminal() {
            return false;
        }
        if self
            .history
            .get(id)
            .is_some_and(|entry| entry.last_status == status)
        {
            return false;
        }
        self.history.insert(
            id.to_string(),
            HistoryEntry {
                last_status: status,
                last_run: at,
            },
        );
        true
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    /// Drop all but the newest persisted log entries.
    pub fn trim_logs(&mut self) {
        if self.logs.len() > MAX_PERSISTED_LOGS {
            let excess = self.logs.len() - MAX_PERSISTED_LOGS;
            self.logs.drain(..excess);
        }
    }

    /// Toggle the verified mark on an extracted unit; returns the new state.
    pub fn toggle_verified(&mut self, id: &str) -> FleetResult<bool> {
        if !self.units.contains(id) {
            return Err(FleetError::UnknownUnit(id.to_string()));
        }
        if self.verified.remove(id) {
            Ok(false)
        } else {
            self.verified.insert(id.to_string());
            Ok(true)
        }
    }

    /// Extracted, unverified units with low confidence or no group
    pub fn review_candidates(&self) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| u.source() == UnitSource::Extracted)
            .filter(|u| !self.verified.contains(u.id()))
            .filter(|u| {
                u.confidence().unwrap_or(0) < REVIEW_CONFIDENCE_THRESHOLD
                    || is_unassigned(u.group())
            })
            .collect()
    }

    /// Save a preset, replacing any preset with the same name.
    pub fn save_preset(&mut self, preset: Preset) {
        self.presets.retain(|p| p.name != preset.name);
        self.presets.push(preset);
    }

    /// Save the units of one normalized group as `"{group} Group"`.
    pub fn save_group_preset(&mut self, group: &str) -> FleetResult<Preset> {
        let group = group.trim();
        if group.is_empty() {
            return Err(FleetError::validation("select a group for the preset"));
        }
        let ids = self.units.ids_in_group(group);
        if ids.is_empty() {
            return Err(FleetError::validation(format!(
                "group '{group}' has no units"
            )));
        }
        let preset = Preset::new(&Preset::group_preset_name(group), ids)?;
        self.save_preset(preset.clone());
        Ok(preset)
    }

    /// Select the preset's units that are still registered.
    pub fn apply_preset(&mut self, name: &str) -> FleetResult<Vec<String>> {
        let preset = self
            .presets
            .iter()
            .find(|p| p.name == name.trim())
            .cloned()
            .ok_or_else(|| FleetError::validation(format!("no preset named '{name}'")))?;
        Ok(self.set_selection(&preset.ids))
    }

    pub fn remove_preset(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name.trim());
        before != self.presets.len()
    }

    /// Clear units, selection, logs and verification. Presets, history and
    /// templates survive.
    pub fn clear(&mut self) {
        self.units = UnitRegistry::new();
        self.selected.clear();
        self.logs.clear();
        self.verified.clear();
    }

    /// Settle units left mid-run by an interrupted process.
    ///
    /// `Queued` units become `Skipped`, `Running` units become `Failed`.
    /// Returns the IDs that were touched.
    pub fn recover_interrupted(&mut self) -> Vec<String> {
        let mut touched = Vec::new();
        for id in self.units.ids_with_status(UnitStatus::Queued) {
            if self.units.transition(&id, UnitStatus::Skipped).is_ok() {
                touched.push(id);
            }
        }
        for id in self.units.ids_with_status(UnitStatus::Running) {
            if self.units.transition(&id, UnitStatus::Failed).is_ok() {
                touched.push(id);
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LogLevel;

    fn session_with(ids: &[&str]) -> FleetSession {
        let mut session = FleetSession::new();
        for id in ids {
            session.add_unit(Unit::manual(*id).unwrap()).unwrap();
        }
        session
    }

    #[test]
    fn manual_units_are_selected_extracted_are_not() {
        let mut session = session_with(&["621001"]);
        session
            .add_unit(Unit::extracted("621002", 99).unwrap())
            .unwrap();
        assert_eq!(session.selected, vec!["621001"]);
    }

    #[test]
    fn selection_drops_unknown_and_duplicate_ids() {
        let mut session = session_with(&["621001", "621002"]);
        let selected = session.set_selection(&[
            "621002".into(),
            "621999".into(),
            "621002".into(),
            "621001".into(),
        ]);
        assert_eq!(selected, vec!["621002", "621001"]);
    }

    #[test]
    fn remove_units_clears_selection_and_verified() {
        let mut session = session_with(&["621001", "621002"]);
        session.verified.insert("621001".into());
        assert_eq!(session.remove_units(&["621001".into(), "621777".into()]), 1);
        assert_eq!(session.selected, vec!["621002"]);
        assert!(session.verified.is_empty());
    }

    #[test]
    fn history_records_only_changes_to_terminal_status() {
        let mut session = FleetSession::new();
        let now = Utc::now();
        assert!(!session.record_history("621001", UnitStatus::Running, now));
        assert!(session.record_history("621001", UnitStatus::Failed, now));
        assert!(!session.record_history("621001", UnitStatus::Failed, now));
        assert!(session.record_history("621001", UnitStatus::Success, now));
        assert_eq!(session.history["621001"].last_status, UnitStatus::Success);
    }

    #[test]
    fn trim_logs_keeps_newest_entries() {
        let mut session = FleetSession::new();
        for i in 0..(MAX_PERSISTED_LOGS + 20) {
            session.push_log(LogEntry::new("SYSTEM", format!("line {i}"), LogLevel::Info));
        }
        session.trim_logs();
        assert_eq!(session.logs.len(), MAX_PERSISTED_LOGS);
        assert_eq!(session.logs[0].message, "line 20");
    }

    #[test]
    fn review_candidates_need_low_confidence_or_no_group() {
        let mut session = FleetSession::new();
        session
            .add_unit(Unit::extracted("621001", 99).unwrap().with_group(Some("North".into())))
            .unwrap();
        session
            .add_unit(Unit::extracted("621002", 80).unwrap().with_group(Some("North".into())))
            .unwrap();
        session.add_unit(Unit::extracted("621003", 99).unwrap()).unwrap();
        session.add_unit(Unit::manual("621004").unwrap()).unwrap();

        let ids: Vec<&str> = session.review_candidates().iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["621002", "621003"]);

        session.toggle_verified("621003").unwrap();
        let ids: Vec<&str> = session.review_candidates().iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["621002"]);
    }

    #[test]
    fn presets_replace_by_name_and_filter_on_apply() {
        let mut session = session_with(&["621001", "621002"]);
        session.save_preset(Preset::new("Night", vec!["621001".into()]).unwrap());
        session.save_preset(
            Preset::new("Night", vec!["621002".into(), "621999".into()]).unwrap(),
        );
        assert_eq!(session.presets.len(), 1);

        let applied = session.apply_preset("Night").unwrap();
        assert_eq!(applied, vec!["621002"]);
        assert_eq!(session.selected, vec!["621002"]);
        assert!(session.apply_preset("Day").is_err());
        assert!(session.remove_preset("Night"));
        assert!(!session.remove_preset("Night"));
    }

    #[test]
    fn group_presets_use_normalized_group() {
        let mut session = session_with(&["621001", "621002"]);
        session.units.set_group("621001", Some("North")).unwrap();
        let preset = session.save_group_preset("Unassigned").unwrap();
        assert_eq!(preset.name, "Unassigned Group");
        assert_eq!(preset.ids, vec!["621002"]);
        assert!(session.save_group_preset("South").is_err());
    }

    #[test]
    fn clear_keeps_presets_and_templates() {
        let mut session = session_with(&["621001"]);
        session.save_preset(Preset::new("p", vec!["621001".into()]).unwrap());
        session.push_log(LogEntry::info("SYSTEM", "hello"));
        session.clear();
        assert!(session.units.is_empty());
        assert!(session.selected.is_empty());
        assert!(session.logs.is_empty());
        assert_eq!(session.presets.len(), 1);
    }

    #[test]
    fn interrupted_runs_are_settled() {
        let mut session = session_with(&["621001", "621002", "621003"]);
        for id in ["621001", "621002"] {
            session.units.transition(id, UnitStatus::Queued).unwrap();
        }
        session.units.transition("621001", UnitStatus::Running).unwrap();

        let touched = session.recover_interrupted();
        assert_eq!(touched, vec!["621002", "621001"]);
        assert_eq!(session.units.get("621001").unwrap().status(), UnitStatus::Failed);
        assert_eq!(session.units.get("621002").unwrap().status(), UnitStatus::Skipped);
        assert_eq!(session.units.get("621003").unwrap().status(), UnitStatus::Pending);
    }
}
