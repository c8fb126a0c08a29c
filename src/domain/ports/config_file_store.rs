//! Config file store port
//!
//! Access to the per-unit staging tree the download scripts populate.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ConfigFile, FileRef};

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("failed to access {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("path is outside the staging root: {path}")]
    OutsideRoot { path: PathBuf },
}

pub trait ConfigFileStore: Send + Sync {
    /// `unit.config` files for one unit, sorted by identity
    fn list(&self, unit_id: &str) -> Result<Vec<FileRef>, FileStoreError>;

    /// Every editable file for one unit, sorted by identity
    fn list_all(&self, unit_id: &str) -> Result<Vec<FileRef>, FileStoreError>;

    fn read(&self, path: &Path) -> Result<String, FileStoreError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), FileStoreError>;

    /// List and read a unit's `unit.config` files
    fn load_configs(&self, unit_id: &str) -> Result<Vec<ConfigFile>, FileStoreError> {
        self.list(unit_id)?
            .into_iter()
            .map(|file| {
                let content = self.read(&file.path)?;
                Ok(ConfigFile::new(file, content))
            })
            .collect()
    }
}
