//! Orchestrator Factory
//!
//! Creates the orchestrator with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;

use crate::application::FleetOrchestrator;
use crate::config::Config;
use crate::error::FleetResult;
use crate::infrastructure::{
    EnvSettingsStore, JsonSessionStore, ProcessScriptHost, StagingConfigStore,
};

/// Type alias for the orchestrator with all production dependencies
pub type ConcreteOrchestrator =
    FleetOrchestrator<ProcessScriptHost, StagingConfigStore, EnvSettingsStore, JsonSessionStore>;

/// Create an orchestrator for the project at `root`
///
/// Relative configured paths resolve against `root`; scripts run with `root`
/// as their working directory and see both `.env` files in their environment.
pub fn create_orchestrator(root: &Path, config: &Config) -> FleetResult<ConcreteOrchestrator> {
    let paths = config.paths.resolve(root);

    let host = ProcessScriptHost::from_config(&config.host)
        .with_working_dir(root)
        .with_env_files(vec![paths.env_file.clone(), paths.env_local_file.clone()]);
    let files = StagingConfigStore::new(paths.staging_root.clone());
    let settings = EnvSettingsStore::new(paths.env_file.clone(), paths.env_local_file.clone());
    let store = JsonSessionStore::new(paths.session_file.clone());

    tracing::debug!(
        root = %root.display(),
        staging = %paths.staging_root.display(),
        session = %paths.session_file.display(),
        "wiring orchestrator"
    );
    FleetOrchestrator::open(host, files, settings, store, config.orchestrator_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn creates_orchestrator_over_empty_project() {
        let dir = tempdir().unwrap();
        let orchestrator = create_orchestrator(dir.path(), &Config::default()).unwrap();

        assert!(orchestrator.snapshot().units.is_empty());
        assert!(!orchestrator.is_running());
    }

    #[test]
    fn corrupt_session_is_reported() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".fleet")).unwrap();
        fs::write(dir.path().join(".fleet/session.json"), "[").unwrap();

        let err = create_orchestrator(dir.path(), &Config::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("corrupted"));
    }
}
