//! JSON Session Store
//!
//! Persists the fleet session as pretty-printed JSON, by default at
//! `.fleet/session.json` in the project root. Reads take a shared lock and
//! writes an exclusive one on `session.lock`; a deployment holds `run.lock`
//! beside it for its whole duration so other processes can tell it is live.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::entities::FleetSession;
use crate::domain::ports::{RunClaim, SessionStore, StoreError};
use crate::infrastructure::fs::atomic_write;

const RUN_LOCK_FILE: &str = "run.lock";

pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn run_lock_path(&self) -> PathBuf {
        self.path.with_file_name(RUN_LOCK_FILE)
    }

    fn access(&self, path: &Path) -> impl FnOnce(io::Error) -> StoreError {
        let path = path.to_path_buf();
        move |source| StoreError::Access { path, source }
    }

    fn open_lock_file(&self, path: &Path) -> Result<fs::File, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(self.access(parent))?;
        }
        fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(self.access(path))
    }

    fn read_session(&self) -> Result<FleetSession, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FleetSession::new()),
            Err(e) => return Err(self.access(&self.path)(e)),
        };

        if content.trim().is_empty() {
            return Ok(FleetSession::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// `try_lock_*` failed because someone else holds the lock
fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<FleetSession, StoreError> {
        if !self.path.exists() {
            return Ok(FleetSession::new());
        }

        let lock_path = self.lock_path();
        let lock_file = self.open_lock_file(&lock_path)?;
        lock_file.lock_shared().map_err(self.access(&lock_path))?;
        let result = self.read_session();
        let _ = lock_file.unlock();
        result
    }

    fn save(&self, session: &FleetSession) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(session).map_err(|e| StoreError::Serialization {
                message: e.to_string(),
            })?;

        let lock_path = self.lock_path();
        let lock_file = self.open_lock_file(&lock_path)?;
        lock_file
            .lock_exclusive()
            .map_err(self.access(&lock_path))?;

        let result =
            atomic_write(&self.path, content.as_bytes()).map_err(self.access(&self.path));

        let _ = lock_file.unlock();
        if result.is_ok() {
            tracing::debug!(path = %self.path.display(), units = session.units.len(), "session saved");
        }
        result
    }

    fn try_claim_run(&self) -> Result<Option<RunClaim>, StoreError> {
        let path = self.run_lock_path();
        let file = self.open_lock_file(&path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "run lock acquired");
                Ok(Some(RunClaim::new(file)))
            }
            Err(e) if is_contended(&e) => Ok(None),
            Err(e) => Err(self.access(&path)(e)),
        }
    }

    fn run_in_progress(&self) -> Result<bool, StoreError> {
        let path = self.run_lock_path();
        if !path.exists() {
            return Ok(false);
        }
        let file = self.open_lock_file(&path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                let _ = file.unlock();
                Ok(false)
            }
            Err(e) if is_contended(&e) => Ok(true),
            Err(e) => Err(self.access(&path)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Preset, Unit};
    use crate::domain::value_objects::LogEntry;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty_session() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), FleetSession::new());
    }

    #[test]
    fn save_then_load_restores_session() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join(".fleet/session.json"));

        let mut session = FleetSession::new();
        session
            .add_unit(Unit::manual("621001").unwrap().with_group(Some("Pumps".into())))
            .unwrap();
        session.save_preset(Preset::new("Night", vec!["621001".to_string()]).unwrap());
        session.push_log(LogEntry::info("621001", "hello"));

        store.save(&session).unwrap();

        assert_eq!(store.load().unwrap(), session);
        assert!(dir.path().join(".fleet/session.lock").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonSessionStore::new(&path).load().unwrap_err();

        assert!(matches!(err, StoreError::Corrupted { .. }));
        assert!(err.to_string().contains("session.json"));
    }

    #[test]
    fn run_claim_is_exclusive_until_dropped() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join(".fleet/session.json"));
        let other = JsonSessionStore::new(dir.path().join(".fleet/session.json"));

        assert!(!other.run_in_progress().unwrap());
        let claim = store.try_claim_run().unwrap().expect("first claim");
        assert!(other.run_in_progress().unwrap());
        assert!(other.try_claim_run().unwrap().is_none());
        assert!(dir.path().join(".fleet/run.lock").exists());

        drop(claim);
        assert!(!other.run_in_progress().unwrap());
        assert!(other.try_claim_run().unwrap().is_some());
    }

    #[test]
    fn checking_an_unused_store_creates_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join(".fleet/session.json"));

        assert!(!store.run_in_progress().unwrap());
        assert_eq!(store.load().unwrap(), FleetSession::new());
        assert!(!dir.path().join(".fleet").exists());
    }
}
