//! Configuration resolver
//!
//! Layers, lowest precedence first:
//! 1. built-in / environment defaults
//! 2. group template overrides (only fields the template names)
//! 3. per-unit IP overrides
//! 4. per-file explicit JSON overrides
//!
//! Layers 1 and 3 resolve the unit's IP map; layers 2 and 4 are shallow
//! key replacements over each config file's JSON object.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::entities::{ConfigFile, FieldOverrides, FileOverrides, GroupTemplate};
use crate::domain::value_objects::{IpOverrides, IpRole};
use crate::error::{FleetError, FleetResult};

/// Process-wide default IP per role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultIps(BTreeMap<IpRole, String>);

impl DefaultIps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: IpRole, value: impl Into<String>) -> Self {
        self.0.insert(role, value.into().trim().to_string());
        self
    }

    /// Trimmed default for `role`, empty when unset
    pub fn get(&self, role: IpRole) -> &str {
        self.0.get(&role).map(String::as_str).unwrap_or("")
    }
}

/// Resolved IP per role; an empty value means "unset"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveIps(BTreeMap<IpRole, String>);

impl EffectiveIps {
    pub fn get(&self, role: IpRole) -> Option<&str> {
        self.0
            .get(&role)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Environment pairs keyed by the default settings key names. Unset roles are omitted.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        IpRole::ALL
            .into_iter()
            .filter_map(|role| {
                self.get(role)
                    .map(|v| (role.settings_key().to_string(), v.to_string()))
            })
            .collect()
    }
}

/// Effective IP for one role: trimmed non-empty override, else non-empty default, else empty.
pub fn effective_ip(overrides: &IpOverrides, defaults: &DefaultIps, role: IpRole) -> String {
    let override_value = overrides.get(&role).map(|v| v.trim()).unwrap_or("");
    if !override_value.is_empty() {
        return override_value.to_string();
    }
    defaults.get(role).trim().to_string()
}

pub fn resolve_ips(overrides: &IpOverrides, defaults: &DefaultIps) -> EffectiveIps {
    EffectiveIps(
        IpRole::ALL
            .into_iter()
            .map(|role| (role, effective_ip(overrides, defaults, role)))
            .collect(),
    )
}

/// Set or clear one IP override.
///
/// A blank value or a value equal to the default (after trimming) removes the
/// override. Returns whether the map changed.
pub fn apply_ip_override(
    overrides: &mut IpOverrides,
    role: IpRole,
    value: &str,
    default: &str,
) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == default.trim() {
        return overrides.remove(&role).is_some();
    }
    let previous = overrides.insert(role, trimmed.to_string());
    previous.as_deref() != Some(trimmed)
}

/// Shallow-merge `overrides` into the JSON object in `base`.
///
/// Untouched keys keep their values; the result is pretty-printed with a
/// two-space indent. A base that is not a JSON object is `MalformedConfig`.
pub fn merge_json(identity: &str, base: &str, overrides: &FieldOverrides) -> FleetResult<String> {
    let mut object = parse_object(identity, base)?;
    for (key, value) in overrides {
        object.insert(key.clone(), value.clone());
    }
    Ok(serde_json::to_string_pretty(&Value::Object(object))?)
}

fn parse_object(identity: &str, content: &str) -> FleetResult<serde_json::Map<String, Value>> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| FleetError::MalformedConfig {
            identity: identity.to_string(),
            message: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FleetError::MalformedConfig {
            identity: identity.to_string(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A config file after layer resolution
#[derive(Debug)]
pub struct ResolvedFile {
    /// Merged file, or the original when nothing applied or the merge failed
    pub file: ConfigFile,
    /// Keys contributed by the template and explicit layers
    pub applied_keys: Vec<String>,
    pub error: Option<FleetError>,
}

impl ResolvedFile {
    pub fn changed(&self) -> bool {
        self.error.is_none() && !self.applied_keys.is_empty()
    }
}

/// File-level layers for one unit
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLayers<'a> {
    pub template: Option<&'a GroupTemplate>,
    pub file_overrides: Option<&'a FileOverrides>,
}

impl<'a> ConfigLayers<'a> {
    pub fn new(template: Option<&'a GroupTemplate>, file_overrides: Option<&'a FileOverrides>) -> Self {
        Self {
            template,
            file_overrides,
        }
    }

    /// Combined field overrides for one file identity; explicit keys win.
    pub fn overrides_for(&self, identity: &str) -> FieldOverrides {
        let mut combined = FieldOverrides::new();
        if let Some(fields) = self.template.and_then(|t| t.overrides_for(identity)) {
            combined.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(fields) = self.file_overrides.and_then(|o| o.get(identity)) {
            combined.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        combined
    }

    /// Merge layers 2 and 4 over one file. Never partially merges.
    pub fn resolve_file(&self, file: &ConfigFile) -> ResolvedFile {
        let overrides = self.overrides_for(&file.identity);
        if overrides.is_empty() {
            return ResolvedFile {
                file: file.clone(),
                applied_keys: Vec::new(),
                error: None,
            };
        }
        match merge_json(&file.identity, &file.content, &overrides) {
            Ok(content) => ResolvedFile {
                file: file.with_content(content),
                applied_keys: overrides.keys().cloned().collect(),
                error: None,
            },
            Err(error) => ResolvedFile {
                file: file.clone(),
                applied_keys: Vec::new(),
                error: Some(error),
            },
        }
    }

    pub fn resolve_files(&self, files: &[ConfigFile]) -> Vec<ResolvedFile> {
        files.iter().map(|f| self.resolve_file(f)).collect()
    }
}

/// Overrides derived from loaded files: every file whose content is a JSON
/// object contributes `identity -> object`. Unparseable files are skipped.
pub fn derive_file_overrides(files: &[ConfigFile]) -> FileOverrides {
    files
        .iter()
        .filter_map(|file| match serde_json::from_str::<Value>(&file.content) {
            Ok(Value::Object(map)) => Some((file.identity.clone(), map)),
            _ => None,
        })
        .collect()
}

/// Explicit overrides for a set of files, failing on the first file that is
/// not a JSON object.
pub fn capture_file_overrides(files: &[ConfigFile]) -> FleetResult<FileOverrides> {
    files
        .iter()
        .map(|file| Ok((file.identity.clone(), parse_object(&file.identity, &file.content)?)))
        .collect()
}

/// Override keys whose value differs from (or is missing in) `base`.
///
/// An unparseable base reports every override key.
pub fn changed_keys(base: &str, overrides: &FieldOverrides) -> Vec<String> {
    let parsed = match serde_json::from_str::<Value>(base) {
        Ok(Value::Object(map)) => map,
        _ => return overrides.keys().cloned().collect(),
    };
    overrides
        .iter()
        .filter(|(key, value)| parsed.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect()
}
