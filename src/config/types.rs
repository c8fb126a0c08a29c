//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::orchestrator::OrchestratorOptions;
use crate::domain::value_objects::script_action::{DEFAULT_DEPLOY_SCRIPT, DEFAULT_UNIT_PARAM};
use crate::domain::value_objects::{default_catalog, ArgStyle, RunMode, ScriptAction};
use crate::error::FleetResult;

use super::loader::{self, ConfigWarning};

/// Deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_script_path")]
    pub script_path: String,

    /// Parameter carrying unit IDs to the deploy script
    #[serde(default = "default_unit_param")]
    pub unit_param: String,

    #[serde(default)]
    pub mode: RunMode,

    #[serde(default)]
    pub continue_on_failure: bool,

    /// Refuse to deploy while required settings are missing
    #[serde(default = "default_true")]
    pub require_settings: bool,

    /// Write resolved config overrides into staging before each unit runs
    #[serde(default)]
    pub stage_configs: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            unit_param: default_unit_param(),
            mode: RunMode::default(),
            continue_on_failure: false,
            require_settings: true,
            stage_configs: false,
        }
    }
}

fn default_script_path() -> String {
    DEFAULT_DEPLOY_SCRIPT.to_string()
}

fn default_unit_param() -> String {
    DEFAULT_UNIT_PARAM.to_string()
}

fn default_true() -> bool {
    true
}

/// File locations. Relative paths resolve against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,

    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    #[serde(default = "default_env_local_file")]
    pub env_local_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            staging_root: default_staging_root(),
            session_file: default_session_file(),
            env_file: default_env_file(),
            env_local_file: default_env_local_file(),
        }
    }
}

impl PathsConfig {
    /// Same paths with relative entries joined onto `root`
    pub fn resolve(&self, root: &Path) -> PathsConfig {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        PathsConfig {
            staging_root: join(&self.staging_root),
            session_file: join(&self.session_file),
            env_file: join(&self.env_file),
            env_local_file: join(&self.env_local_file),
        }
    }
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("staging")
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".fleet/session.json")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_env_local_file() -> PathBuf {
    PathBuf::from(".env.local")
}

/// Script interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Arguments placed before the script path
    #[serde(default = "default_interpreter_args")]
    pub interpreter_args: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interpreter_args: default_interpreter_args(),
        }
    }
}

fn default_interpreter() -> String {
    if cfg!(windows) {
        "powershell.exe".to_string()
    } else {
        "pwsh".to_string()
    }
}

fn default_interpreter_args() -> Vec<String> {
    ["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub host: HostConfig,

    /// Script catalogue; empty means the built-in one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ScriptAction>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> FleetResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> FleetResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Serialize to a TOML file
    pub fn save(&self, path: &Path) -> FleetResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| crate::error::FleetError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The deploy script as a catalogue action
    pub fn deploy_action(&self) -> ScriptAction {
        ScriptAction::new("deploy", "Deploy Selected", self.deploy.script_path.clone())
            .with_units(self.deploy.unit_param.clone(), ArgStyle::Comma)
    }

    /// Configured catalogue, or the built-in one with the configured deploy script
    pub fn catalog(&self) -> Vec<ScriptAction> {
        if !self.actions.is_empty() {
            return self.actions.clone();
        }
        default_catalog()
            .into_iter()
            .map(|action| {
                if action.id == "deploy" {
                    self.deploy_action()
                } else {
                    action
                }
            })
            .collect()
    }

    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions::new()
            .with_deploy_action(self.deploy_action())
            .with_actions(self.catalog())
            .with_require_settings(self.deploy.require_settings)
            .with_stage_configs(self.deploy.stage_configs)
    }
}
