//! Configuration module for fleet-deploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FLEET_*)
//! 3. Project config (./fleet.toml)
//! 4. User config (<config_dir>/fleet-deploy/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load_layered, load_with_warnings, user_config_path, with_env_overrides, ConfigWarning,
    LoadedConfig, PROJECT_CONFIG_FILE,
};
pub use types::{Config, DeployConfig, HostConfig, PathsConfig};
