//! Per-unit configuration: IP overrides, explicit file overrides and group
//! templates applied to the staging tree.

use std::collections::BTreeMap;

use crate::domain::entities::{ConfigFile, FileOverrides, FileRef, GroupTemplate, HistoryEntry};
use crate::domain::ports::{ConfigFileStore, ScriptHost, SessionStore, SettingsStore};
use crate::domain::services::config_resolver::{
    apply_ip_override, capture_file_overrides, changed_keys, resolve_ips, ConfigLayers,
    EffectiveIps,
};
use crate::domain::value_objects::{IpOverrides, IpRole, LogEntry};
use crate::error::{FleetError, FleetResult};

use super::result::ConfigPreview;
use super::use_case::FleetOrchestrator;

impl<H, F, S, T> FleetOrchestrator<H, F, S, T>
where
    H: ScriptHost,
    F: ConfigFileStore,
    S: SettingsStore,
    T: SessionStore,
{
    fn ensure_unit(&self, id: &str) -> FleetResult<()> {
        if self.lock().units.contains(id) {
            Ok(())
        } else {
            Err(FleetError::UnknownUnit(id.to_string()))
        }
    }

    /// Set one IP override for a unit. Blank or default-equal values remove it.
    ///
    /// Returns whether the stored overrides changed.
    pub fn set_ip_override(&self, id: &str, role: IpRole, value: &str) -> FleetResult<bool> {
        let defaults = self.settings.snapshot()?.defaults();
        let mut overrides = self
            .lock()
            .units
            .get(id)
            .map(|unit| unit.ip_overrides().clone())
            .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;

        if !apply_ip_override(&mut overrides, role, value, defaults.get(role)) {
            return Ok(false);
        }

        self.settings.write_unit_overrides(id, &overrides)?;
        self.mutate(|session| {
            let unit = session
                .units
                .get_mut(id)
                .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
            *unit.ip_overrides_mut() = overrides;
            Ok(())
        })?;
        tracing::info!(unit = %id, role = %role, "ip override updated");
        Ok(true)
    }

    /// Effective IPs for a unit, from one consistent snapshot.
    pub fn effective_ips(&self, id: &str) -> FleetResult<EffectiveIps> {
        let overrides: IpOverrides = self
            .lock()
            .units
            .get(id)
            .map(|unit| unit.ip_overrides().clone())
            .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
        let defaults = self.settings.snapshot()?.defaults();
        Ok(resolve_ips(&overrides, &defaults))
    }

    /// The unit's explicit file overrides as stored in settings
    pub fn unit_file_overrides(&self, id: &str) -> FleetResult<FileOverrides> {
        self.ensure_unit(id)?;
        Ok(self.settings.snapshot()?.unit_file_overrides(id))
    }

    /// Every editable file in the unit's staging tree
    pub fn list_unit_files(&self, id: &str) -> FleetResult<Vec<FileRef>> {
        self.ensure_unit(id)?;
        Ok(self.files.list_all(id)?)
    }

    /// The unit's `unit.config` files with only its explicit overrides applied
    pub fn load_unit_configs(&self, id: &str) -> FleetResult<Vec<ConfigPreview>> {
        let explicit = self.unit_file_overrides(id)?;
        let files = self.files.load_configs(id)?;
        Ok(preview(&ConfigLayers::new(None, Some(&explicit)), &files))
    }

    /// Preview the unit's group template and explicit overrides over its files.
    pub fn preview_template(&self, id: &str) -> FleetResult<Vec<ConfigPreview>> {
        let template = self.group_template_for(id)?;
        let explicit = self.settings.snapshot()?.unit_file_overrides(id);
        let files = self.files.load_configs(id)?;
        Ok(preview(
            &ConfigLayers::new(template.as_ref(), Some(&explicit)),
            &files,
        ))
    }

    /// Write the template preview to the staging tree. Files that fail to
    /// parse are left untouched and reported in the returned previews.
    pub fn apply_template(&self, id: &str) -> FleetResult<Vec<ConfigPreview>> {
        let previews = self.preview_template(id)?;
        let mut written = 0usize;
        for item in previews.iter().filter(|p| p.is_changed()) {
            self.files.write(&item.path, &item.resolved)?;
            written += 1;
        }
        if written > 0 {
            self.mutate(|session| {
                session.push_log(LogEntry::info(
                    id,
                    format!("Applied group template to {written} config file(s)."),
                ));
                Ok(())
            })?;
        }
        tracing::info!(unit = %id, written, "template applied");
        Ok(previews)
    }

    /// Store the unit's current `unit.config` contents as its explicit overrides.
    ///
    /// Fails without writing anything if any file is not a JSON object.
    pub fn save_config_overrides(&self, id: &str) -> FleetResult<usize> {
        self.ensure_unit(id)?;
        let files = self.files.load_configs(id)?;
        let overrides = capture_file_overrides(&files)?;
        self.settings.write_unit_config_overrides(id, &overrides)?;
        tracing::info!(unit = %id, files = overrides.len(), "config overrides saved");
        Ok(overrides.len())
    }

    /// Save one edited `unit.config` and record it as an explicit override.
    pub fn write_config(&self, id: &str, identity: &str, content: &str) -> FleetResult<()> {
        self.ensure_unit(id)?;
        let file = self
            .files
            .list(id)?
            .into_iter()
            .find(|f| f.identity == identity)
            .ok_or_else(|| {
                FleetError::validation(format!("unit {id} has no config file '{identity}'"))
            })?;

        let edited = ConfigFile::new(file, content);
        let mut captured = capture_file_overrides(std::slice::from_ref(&edited))?;
        self.files.write(&edited.path, &edited.content)?;

        let mut overrides = self.settings.snapshot()?.unit_file_overrides(id);
        if let Some(fields) = captured.remove(identity) {
            overrides.insert(identity.to_string(), fields);
        }
        self.settings.write_unit_config_overrides(id, &overrides)?;
        Ok(())
    }

    /// Raw content of one file in the unit's staging tree
    pub fn read_unit_file(&self, id: &str, identity: &str) -> FleetResult<String> {
        let file = self
            .list_unit_files(id)?
            .into_iter()
            .find(|f| f.identity == identity)
            .ok_or_else(|| {
                FleetError::validation(format!("unit {id} has no file '{identity}'"))
            })?;
        Ok(self.files.read(&file.path)?)
    }

    pub fn templates(&self) -> BTreeMap<String, GroupTemplate> {
        self.lock().templates.clone()
    }

    pub fn history(&self) -> BTreeMap<String, HistoryEntry> {
        self.lock().history.clone()
    }

    fn group_template_for(&self, id: &str) -> FleetResult<Option<GroupTemplate>> {
        let state = self.lock();
        let unit = state
            .units
            .get(id)
            .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
        Ok(state.templates.get(&unit.normalized_group()).cloned())
    }
}

fn preview(layers: &ConfigLayers<'_>, files: &[ConfigFile]) -> Vec<ConfigPreview> {
    files
        .iter()
        .map(|file| {
            let overrides = layers.overrides_for(&file.identity);
            let resolved = layers.resolve_file(file);
            ConfigPreview {
                identity: file.identity.clone(),
                path: file.path.clone(),
                current: file.content.clone(),
                resolved: resolved.file.content.clone(),
                applied_keys: resolved.applied_keys.clone(),
                changed_keys: if resolved.error.is_some() {
                    Vec::new()
                } else {
                    changed_keys(&file.content, &overrides)
                },
                error: resolved.error.map(|e| e.to_string()),
            }
        })
        .collect()
}
