//! Orchestrator Options
//!
//! Configuration for the orchestrator and for individual runs.

use crate::domain::value_objects::{default_catalog, default_deploy_action, RunMode, ScriptAction};

/// Long-lived orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Script used by `start_run`
    pub deploy_action: ScriptAction,
    /// Catalogue for `run_action`
    pub actions: Vec<ScriptAction>,
    /// Refuse to start runs while required settings are missing
    pub require_settings: bool,
    /// Write template and explicit overrides into a unit's staging files
    /// before its script runs; a batch stages every unit before dispatch
    pub stage_configs: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            deploy_action: default_deploy_action(),
            actions: default_catalog(),
            require_settings: true,
            stage_configs: false,
        }
    }
}

impl OrchestratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deploy_action(mut self, action: ScriptAction) -> Self {
        self.deploy_action = action;
        self
    }

    /// Override the deploy script path, keeping its argument convention
    pub fn with_script_path(mut self, path: impl Into<String>) -> Self {
        self.deploy_action.path = path.into();
        self
    }

    pub fn with_actions(mut self, actions: Vec<ScriptAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_require_settings(mut self, require: bool) -> Self {
        self.require_settings = require;
        self
    }

    pub fn with_stage_configs(mut self, stage: bool) -> Self {
        self.stage_configs = stage;
        self
    }

    pub fn find_action(&self, id: &str) -> Option<&ScriptAction> {
        self.actions.iter().find(|a| a.id == id)
    }
}

/// Per-run options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Keep going after a unit fails (sequential mode only)
    pub continue_on_failure: bool,
}

impl RunOptions {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            continue_on_failure: false,
        }
    }

    pub fn sequential() -> Self {
        Self::new(RunMode::Sequential)
    }

    pub fn batch() -> Self {
        Self::new(RunMode::Batch)
    }

    pub fn with_continue_on_failure(mut self, cont: bool) -> Self {
        self.continue_on_failure = cont;
        self
    }
}
