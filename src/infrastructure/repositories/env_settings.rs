//! `.env` Settings Store
//!
//! Reads `.env` overlaid by `.env.local` (local wins). Every write goes to
//! `.env.local` only; the base file is treated as read-only.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::entities::template::canonical_json;
use crate::domain::entities::FileOverrides;
use crate::domain::ports::{SettingsEntry, SettingsError, SettingsStore};
use crate::domain::services::settings_view::{is_unit_key, unit_config_overrides_key, SECRET_KEY};
use crate::domain::value_objects::{IpOverrides, IpRole};
use crate::infrastructure::fs::{atomic_write, read_env_file, render_env};

type EnvPairs = Vec<(String, String)>;

pub struct EnvSettingsStore {
    base_path: PathBuf,
    local_path: PathBuf,
}

impl EnvSettingsStore {
    pub fn new(base_path: impl Into<PathBuf>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            local_path: local_path.into(),
        }
    }

    /// `.env` and `.env.local` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(".env"), dir.join(".env.local"))
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    fn lock_path(&self) -> PathBuf {
        self.local_path.with_extension("lock")
    }

    fn read(&self, path: &Path) -> Result<EnvPairs, SettingsError> {
        read_env_file(path).map_err(|e| match e {
            dotenvy::Error::Io(source) => SettingsError::Access {
                path: path.to_path_buf(),
                source,
            },
            other => SettingsError::Parse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })
    }

    /// Base entries overlaid by local ones, secret included
    fn merged(&self) -> Result<EnvPairs, SettingsError> {
        let mut merged = self.read(&self.base_path)?;
        for (key, value) in self.read(&self.local_path)? {
            upsert(&mut merged, key, value);
        }
        Ok(merged)
    }

    /// Read-modify-write `.env.local` under an exclusive lock
    fn update_local<F>(&self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut EnvPairs) -> Result<(), SettingsError>,
    {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(access(parent))?;
        }
        let lock_file = fs::File::create(&lock_path).map_err(access(&lock_path))?;
        lock_file.lock_exclusive().map_err(access(&lock_path))?;

        let result = self.read(&self.local_path).and_then(|mut local| {
            f(&mut local)?;
            atomic_write(&self.local_path, render_env(&local).as_bytes())
                .map_err(access(&self.local_path))
        });

        let _ = lock_file.unlock();
        result
    }
}

fn access(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Access { path, source }
}

fn upsert(pairs: &mut EnvPairs, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(existing) => existing.1 = value,
        None => pairs.push((key, value)),
    }
}

impl SettingsStore for EnvSettingsStore {
    fn read_entries(&self) -> Result<Vec<SettingsEntry>, SettingsError> {
        Ok(self
            .merged()?
            .into_iter()
            .filter(|(key, _)| key != SECRET_KEY)
            .map(|(key, value)| SettingsEntry::new(key, value))
            .collect())
    }

    fn has_secret(&self) -> Result<bool, SettingsError> {
        Ok(self
            .merged()?
            .iter()
            .any(|(key, value)| key == SECRET_KEY && !value.trim().is_empty()))
    }

    fn write_entries(&self, entries: &[SettingsEntry]) -> Result<(), SettingsError> {
        self.update_local(|local| {
            let secret = local
                .iter()
                .find(|(key, _)| key == SECRET_KEY)
                .map(|(_, value)| value.clone());
            let unit_keys: EnvPairs = local
                .iter()
                .filter(|(key, _)| is_unit_key(key))
                .cloned()
                .collect();

            let mut next: EnvPairs = Vec::with_capacity(entries.len() + unit_keys.len() + 1);
            for entry in entries {
                let key = entry.key.trim();
                if key.is_empty() || key == SECRET_KEY || is_unit_key(key) {
                    continue;
                }
                upsert(&mut next, key.to_string(), entry.value.clone());
            }
            next.extend(unit_keys);
            if let Some(secret) = secret {
                next.push((SECRET_KEY.to_string(), secret));
            }
            *local = next;
            Ok(())
        })?;
        tracing::debug!(path = %self.local_path.display(), entries = entries.len(), "settings written");
        Ok(())
    }

    fn write_unit_overrides(
        &self,
        unit_id: &str,
        overrides: &IpOverrides,
    ) -> Result<(), SettingsError> {
        self.update_local(|local| {
            let role_keys: Vec<String> = IpRole::ALL
                .iter()
                .map(|role| role.unit_settings_key(unit_id))
                .collect();
            local.retain(|(key, _)| !role_keys.iter().any(|k| k.eq_ignore_ascii_case(key)));
            for (role, value) in overrides {
                if !value.trim().is_empty() {
                    local.push((role.unit_settings_key(unit_id), value.trim().to_string()));
                }
            }
            Ok(())
        })
    }

    fn write_unit_config_overrides(
        &self,
        unit_id: &str,
        overrides: &FileOverrides,
    ) -> Result<(), SettingsError> {
        let key = unit_config_overrides_key(unit_id);
        self.update_local(|local| {
            local.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
            if !overrides.is_empty() {
                local.push((key.clone(), canonical_json(overrides)));
            }
            Ok(())
        })
    }
}
