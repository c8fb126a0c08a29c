//! Session operations: registration, selection, presets, review, retry,
//! import and settings editing.

use crate::domain::entities::{parse_unit_list, FleetSession, Preset, Unit, UnitSource};
use crate::domain::entities::unit::EXTRACTED_CONFIDENCE;
use crate::domain::ports::{
    dedupe_extracted, ConfigFileStore, ScriptHost, SessionStore, SettingsEntry, SettingsError,
    SettingsStore, UnitExtractor,
};
use crate::domain::services::settings_view::{is_unit_key, SECRET_KEY};
use crate::domain::value_objects::{normalize_group_input, LogEntry, UnitStatus, SYSTEM_UNIT};
use crate::error::{FleetError, FleetResult};

use super::result::{AddReport, ImportReport};
use super::use_case::FleetOrchestrator;

/// Extractions reporting fewer units than this get a review warning
const MIN_EXPECTED_EXTRACTED: usize = 2;

impl<H, F, S, T> FleetOrchestrator<H, F, S, T>
where
    H: ScriptHost,
    F: ConfigFileStore,
    S: SettingsStore,
    T: SessionStore,
{
    /// Register one unit by hand. It joins the selection.
    pub fn add_unit(&self, id: &str, group: Option<&str>) -> FleetResult<()> {
        let unit = self.manual_unit(id.trim(), group)?;
        self.mutate(|session| session.add_unit(unit))?;
        tracing::info!(unit = %id.trim(), "unit added");
        Ok(())
    }

    /// Register every valid ID in free-form input (whitespace or comma separated).
    pub fn add_units(&self, input: &str, group: Option<&str>) -> FleetResult<AddReport> {
        let (valid, invalid) = parse_unit_list(input);
        if valid.is_empty() && invalid.is_empty() {
            return Err(FleetError::validation("no unit IDs given"));
        }

        let mut units = Vec::with_capacity(valid.len());
        for id in &valid {
            units.push(self.manual_unit(id, group)?);
        }

        let report = self.mutate(|session| {
            let mut report = AddReport {
                invalid,
                ..AddReport::default()
            };
            for unit in units {
                let id = unit.id().to_string();
                if session.units.contains(&id) {
                    report.already_registered.push(id);
                } else {
                    session.add_unit(unit)?;
                    report.added.push(id);
                }
            }
            Ok(report)
        })?;

        tracing::info!(
            added = report.added.len(),
            existing = report.already_registered.len(),
            invalid = report.invalid.len(),
            "units added"
        );
        Ok(report)
    }

    fn manual_unit(&self, id: &str, group: Option<&str>) -> FleetResult<Unit> {
        let mut unit = Unit::manual(id)?.with_group(normalize_group_input(group));
        if let Some(overrides) = self.settings.snapshot()?.unit_ip_overrides().remove(id) {
            *unit.ip_overrides_mut() = overrides;
        }
        Ok(unit)
    }

    /// Remove units from the registry. Not allowed while a run is active.
    pub fn remove_units(&self, ids: &[String]) -> FleetResult<usize> {
        self.ensure_idle()?;
        let removed = self.mutate(|session| Ok(session.remove_units(ids)))?;
        tracing::info!(removed, "units removed");
        Ok(removed)
    }

    /// Assign (or clear, with `None` / blank / "Unassigned") the group of each unit.
    pub fn set_group(&self, ids: &[String], group: Option<&str>) -> FleetResult<()> {
        let group = normalize_group_input(group);
        self.mutate(|session| {
            session.units.ensure_known(ids)?;
            for id in ids {
                session.units.set_group(id, group.as_deref())?;
            }
            Ok(())
        })
    }

    /// Replace the selection; returns the IDs actually selected.
    pub fn select(&self, ids: &[String]) -> FleetResult<Vec<String>> {
        self.mutate(|session| {
            session.units.ensure_known(ids)?;
            Ok(session.set_selection(ids))
        })
    }

    /// Flip the reviewed mark on an extracted unit.
    pub fn toggle_verified(&self, id: &str) -> FleetResult<bool> {
        self.mutate(|session| session.toggle_verified(id))
    }

    pub fn save_preset(&self, name: &str, ids: &[String]) -> FleetResult<Preset> {
        let preset = Preset::new(name, ids.to_vec())?;
        self.mutate(|session| {
            session.units.ensure_known(&preset.ids)?;
            session.save_preset(preset.clone());
            Ok(preset)
        })
    }

    pub fn save_group_preset(&self, group: &str) -> FleetResult<Preset> {
        self.mutate(|session| session.save_group_preset(group))
    }

    /// Select the preset's units; IDs no longer registered are dropped.
    pub fn apply_preset(&self, name: &str) -> FleetResult<Vec<String>> {
        self.mutate(|session| session.apply_preset(name))
    }

    pub fn remove_preset(&self, name: &str) -> FleetResult<bool> {
        self.mutate(|session| Ok(session.remove_preset(name)))
    }

    /// Reset a failed unit to `Pending` and re-select it.
    ///
    /// Returns `false` (and changes nothing) when the unit is not `Failed`.
    pub fn retry_unit(&self, id: &str) -> FleetResult<bool> {
        self.ensure_idle()?;
        let retried = self.mutate(|session| {
            let status = session
                .units
                .get(id)
                .map(|unit| unit.status())
                .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
            if status != UnitStatus::Failed {
                return Ok(false);
            }
            session.units.transition(id, UnitStatus::Pending)?;
            session.add_to_selection(id);
            session.push_log(LogEntry::info(id, "Reset for retry."));
            Ok(true)
        })?;
        if retried {
            tracing::info!(unit = %id, "unit reset for retry");
        }
        Ok(retried)
    }

    /// Register units reported by the extraction service.
    ///
    /// New units arrive unselected and unverified; IDs that fail validation
    /// are reported back and skipped.
    pub fn import_extracted(
        &self,
        extractor: &dyn UnitExtractor,
        image: &[u8],
    ) -> FleetResult<ImportReport> {
        let extracted = match extractor.extract(image) {
            Ok(units) => dedupe_extracted(units),
            Err(e) => {
                let message = format!("Extraction failed: {e:#}");
                tracing::error!(error = %e, "unit extraction failed");
                self.mutate(|session| {
                    session.push_log(LogEntry::error(SYSTEM_UNIT, message.clone()));
                    Ok(())
                })?;
                return Err(FleetError::System(message));
            }
        };

        let report = self.mutate(|session| {
            let mut report = ImportReport {
                detected: extracted.len(),
                ..ImportReport::default()
            };
            for found in &extracted {
                if session.units.contains(&found.id) {
                    report.already_registered.push(found.id.clone());
                    continue;
                }
                let unit = match Unit::extracted(found.id.as_str(), EXTRACTED_CONFIDENCE) {
                    Ok(unit) => unit.with_group(normalize_group_input(found.group.as_deref())),
                    Err(_) => {
                        report.invalid.push(found.id.clone());
                        continue;
                    }
                };
                session.add_unit(unit)?;
                report.added.push(found.id.clone());
            }

            session.push_log(LogEntry::info(
                SYSTEM_UNIT,
                format!(
                    "Extraction detected {} unit(s); added {}.",
                    report.detected,
                    report.added.len()
                ),
            ));
            if report.detected < MIN_EXPECTED_EXTRACTED {
                session.push_log(LogEntry::warning(
                    SYSTEM_UNIT,
                    "Warning: Fewer than 2 units detected. Please verify extraction results.",
                ));
            }
            Ok(report)
        })?;

        tracing::info!(
            detected = report.detected,
            added = report.added.len(),
            invalid = report.invalid.len(),
            "extraction imported"
        );
        Ok(report)
    }

    /// Session log rendered one entry per line
    pub fn export_logs(&self) -> Vec<String> {
        self.lock().logs.iter().map(LogEntry::render).collect()
    }

    /// Drop units, selection, logs and review marks. Presets, history and
    /// templates are kept.
    pub fn clear_session(&self) -> FleetResult<()> {
        self.ensure_idle()?;
        self.mutate(|session: &mut FleetSession| {
            session.clear();
            Ok(())
        })
    }

    /// General settings (no `UNIT_*` keys, never the secret)
    pub fn list_settings(&self) -> FleetResult<Vec<SettingsEntry>> {
        Ok(self
            .settings
            .read_entries()?
            .into_iter()
            .filter(|entry| !is_unit_key(&entry.key))
            .collect())
    }

    /// Set one general setting. A blank value removes it.
    pub fn set_setting(&self, key: &str, value: &str) -> FleetResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(FleetError::validation("setting key is required"));
        }
        if key.eq_ignore_ascii_case(SECRET_KEY) {
            return Err(SettingsError::ReservedKey {
                key: key.to_string(),
            }
            .into());
        }
        if is_unit_key(key) {
            return Err(FleetError::validation(format!(
                "'{key}' is a per-unit key; use the unit commands to change it"
            )));
        }

        let mut entries = self.list_settings()?;
        entries.retain(|entry| entry.key != key);
        if !value.trim().is_empty() {
            entries.push(SettingsEntry::new(key, value.trim()));
        }
        self.settings.write_entries(&entries)?;
        tracing::info!(key, "setting updated");
        Ok(())
    }

    pub fn unset_setting(&self, key: &str) -> FleetResult<()> {
        self.set_setting(key, "")
    }

    /// Required settings that are absent or blank
    pub fn missing_settings(&self) -> FleetResult<Vec<&'static str>> {
        Ok(self.settings.snapshot()?.missing_required_keys())
    }

    /// Whether a unit came from extraction and still awaits review
    pub fn needs_review(&self, id: &str) -> bool {
        let session = self.lock();
        session
            .units
            .get(id)
            .is_some_and(|unit| unit.source() == UnitSource::Extracted)
            && !session.verified.contains(id)
    }
}
