//! Session store port
//!
//! Persists the fleet session (units, presets, history, templates, logs)
//! across restarts, and arbitrates which process may run a deployment.

use std::path::PathBuf;

use crate::domain::entities::FleetSession;

/// Exclusive right to run against a store, released on drop
pub struct RunClaim {
    held: Option<Box<dyn Send>>,
}

impl RunClaim {
    /// Claim backed by a resource whose drop releases it (a locked file)
    pub fn new(held: impl Send + 'static) -> Self {
        Self {
            held: Some(Box::new(held)),
        }
    }

    /// Claim for stores only ever opened by one process
    pub fn local() -> Self {
        Self { held: None }
    }
}

impl std::fmt::Debug for RunClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunClaim")
            .field("held", &self.held.is_some())
            .finish()
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the stored session; a missing store yields an empty session.
    fn load(&self) -> Result<FleetSession, StoreError>;

    fn save(&self, session: &FleetSession) -> Result<(), StoreError>;

    /// Claim the store for one run or script action. `Ok(None)` means another
    /// process holds the claim.
    fn try_claim_run(&self) -> Result<Option<RunClaim>, StoreError> {
        Ok(Some(RunClaim::local()))
    }

    /// Whether a claim is currently held, by this process or another one
    fn run_in_progress(&self) -> Result<bool, StoreError> {
        Ok(false)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access session file {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize session: {message}")]
    Serialization { message: String },

    #[error("session file corrupted: {path} ({message})")]
    Corrupted { path: PathBuf, message: String },
}
