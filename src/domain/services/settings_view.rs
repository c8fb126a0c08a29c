//! Read-only view over the flat settings store
//!
//! Interprets the key/value entries: default IPs, per-unit IP overrides,
//! per-unit file overrides and the pre-flight required keys.

use std::collections::BTreeMap;

use crate::domain::entities::FileOverrides;
use crate::domain::services::config_resolver::DefaultIps;
use crate::domain::value_objects::{IpOverrides, IpRole};

/// Reserved secret key. Never returned by reads, preserved by writes.
pub const SECRET_KEY: &str = "PAT";

/// Prefix shared by every per-unit settings key
pub const UNIT_KEY_PREFIX: &str = "UNIT_";

const CONFIG_OVERRIDES_SUFFIX: &str = "_CONFIG_OVERRIDES";

/// Keys a deployment needs before it may start (the secret is checked by presence only)
pub const REQUIRED_KEYS: [&str; 6] = [
    SECRET_KEY,
    "LinuxHost",
    "LinuxUser",
    "LinuxPassword",
    "MPC_DataVanHMIIp",
    "MPC_LocalHMIIp",
];

/// Settings key holding one unit's explicit file overrides
pub fn unit_config_overrides_key(unit_id: &str) -> String {
    format!("{UNIT_KEY_PREFIX}{unit_id}{CONFIG_OVERRIDES_SUFFIX}")
}

pub fn is_unit_key(key: &str) -> bool {
    key.get(..UNIT_KEY_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(UNIT_KEY_PREFIX))
}

/// Split `UNIT_{id}_{rest}` into `(id, rest)`
fn split_unit_key(key: &str) -> Option<(&str, &str)> {
    if !is_unit_key(key) {
        return None;
    }
    let tail = &key[UNIT_KEY_PREFIX.len()..];
    let (id, rest) = tail.split_once('_')?;
    if id.is_empty() || rest.is_empty() {
        None
    } else {
        Some((id, rest))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    entries: BTreeMap<String, String>,
    has_secret: bool,
}

impl SettingsSnapshot {
    pub fn from_entries<I, K, V>(entries: I, has_secret: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(k, _)| k != SECRET_KEY)
                .collect(),
            has_secret,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn has_secret(&self) -> bool {
        self.has_secret
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Entries as environment variables for the script host
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn defaults(&self) -> DefaultIps {
        IpRole::ALL
            .into_iter()
            .fold(DefaultIps::new(), |defaults, role| {
                match self.lookup_ci(role.settings_key()) {
                    Some(value) => defaults.with(role, value),
                    None => defaults,
                }
            })
    }

    fn lookup_ci(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Per-unit IP overrides from `UNIT_{id}_{defaultKey}` entries
    pub fn unit_ip_overrides(&self) -> BTreeMap<String, IpOverrides> {
        let mut result: BTreeMap<String, IpOverrides> = BTreeMap::new();
        for (key, value) in &self.entries {
            let Some((id, rest)) = split_unit_key(key) else {
                continue;
            };
            let Some(role) = IpRole::from_settings_key(rest) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            result
                .entry(id.to_string())
                .or_default()
                .insert(role, value.trim().to_string());
        }
        result
    }

    /// Explicit file overrides for one unit. Unparseable values are ignored.
    pub fn unit_file_overrides(&self, unit_id: &str) -> FileOverrides {
        let key = unit_config_overrides_key(unit_id);
        self.lookup_ci(&key)
            .and_then(|raw| match serde_json::from_str::<FileOverrides>(raw) {
                Ok(overrides) => Some(overrides),
                Err(e) => {
                    tracing::warn!(unit = %unit_id, error = %e, "ignoring unparseable config overrides");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Required keys that are missing or blank
    pub fn missing_required_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .into_iter()
            .filter(|key| {
                if *key == SECRET_KEY {
                    !self.has_secret
                } else {
                    self.get(key).map_or(true, |v| v.trim().is_empty())
                }
            })
            .collect()
    }
}
