//! Staging config store
//!
//! Layout:
//!
//! ```text
//! <root>/<unitId>/**/unit.config                     live files
//! <root>/.unit-config-overrides/<unitId>/**/unit.config  mirror of saved edits
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::entities::config_file::identity_from_relative;
use crate::domain::entities::FileRef;
use crate::domain::ports::{ConfigFileStore, FileStoreError};
use crate::infrastructure::fs::atomic_write;

/// Name of the per-unit config files the resolver works on
pub const UNIT_CONFIG_FILE: &str = "unit.config";

/// Directory under the staging root that mirrors saved `unit.config` edits
pub const OVERRIDES_DIR: &str = ".unit-config-overrides";

/// Extensions listed by `list_all`
pub const EDITABLE_EXTENSIONS: [&str; 6] = ["config", "json", "txt", "ini", "yml", "yaml"];

const BOM: char = '\u{feff}';

pub struct StagingConfigStore {
    root: PathBuf,
}

impl StagingConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<unitId>`, refusing IDs that would escape the root
    fn unit_root(&self, unit_id: &str) -> Result<PathBuf, FileStoreError> {
        let mut components = Path::new(unit_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if unit_id != OVERRIDES_DIR => {
                Ok(self.root.join(unit_id))
            }
            _ => Err(FileStoreError::OutsideRoot {
                path: self.root.join(unit_id),
            }),
        }
    }

    fn ensure_inside(&self, path: &Path) -> Result<(), FileStoreError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if escapes || !path.starts_with(&self.root) {
            return Err(FileStoreError::OutsideRoot {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn walk(
        &self,
        unit_id: &str,
        keep: impl Fn(&Path) -> bool,
    ) -> Result<Vec<FileRef>, FileStoreError> {
        let unit_root = self.unit_root(unit_id)?;
        if !unit_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&unit_root)
            .standard_filters(false)
            .follow_links(false)
            .build();
        for entry in walker {
            let entry = entry.map_err(|e| FileStoreError::Access {
                path: unit_root.clone(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("staging walk failed")),
            })?;
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if !is_file || !keep(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&unit_root) else {
                continue;
            };
            files.push(FileRef {
                identity: identity_from_relative(relative),
                path: entry.path().to_path_buf(),
            });
        }

        files.sort();
        Ok(files)
    }

    /// Mirror location for a saved `unit.config`, if `path` is one
    fn mirror_path(&self, path: &Path) -> Option<PathBuf> {
        if !is_unit_config(path) {
            return None;
        }
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut components = relative.components();
        let unit_id = match components.next()? {
            Component::Normal(id) if id != OVERRIDES_DIR => id,
            _ => return None,
        };
        let rest = components.as_path();
        if rest.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(OVERRIDES_DIR).join(unit_id).join(rest))
    }
}

fn is_unit_config(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(UNIT_CONFIG_FILE))
}

fn is_editable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            EDITABLE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

impl ConfigFileStore for StagingConfigStore {
    fn list(&self, unit_id: &str) -> Result<Vec<FileRef>, FileStoreError> {
        self.walk(unit_id, is_unit_config)
    }

    fn list_all(&self, unit_id: &str) -> Result<Vec<FileRef>, FileStoreError> {
        self.walk(unit_id, is_editable)
    }

    fn read(&self, path: &Path) -> Result<String, FileStoreError> {
        self.ensure_inside(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| FileStoreError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(match content.strip_prefix(BOM) {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), FileStoreError> {
        self.ensure_inside(path)?;
        let content = content.strip_prefix(BOM).unwrap_or(content);

        atomic_write(path, content.as_bytes()).map_err(|source| FileStoreError::Access {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(mirror) = self.mirror_path(path) {
            atomic_write(&mirror, content.as_bytes()).map_err(|source| {
                FileStoreError::Access {
                    path: mirror.clone(),
                    source,
                }
            })?;
            tracing::debug!(path = %path.display(), mirror = %mirror.display(), "unit.config mirrored");
        }
        Ok(())
    }
}
