//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::RunMode;
use crate::error::{FleetError, FleetResult};

use super::types::Config;

/// Project config file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "fleet.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Configuration plus where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the values came from; `None` when only defaults applied
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> FleetResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| FleetError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config if present, else user config, else defaults; then `FLEET_*`
/// environment overrides.
pub fn load_layered(project_root: &Path) -> FleetResult<LoadedConfig> {
    let candidates = [
        Some(project_root.join(PROJECT_CONFIG_FILE)),
        user_config_path(),
    ];

    let mut loaded = LoadedConfig::default();
    if let Some(path) = candidates.into_iter().flatten().find(|p| p.exists()) {
        let (config, warnings) = load_with_warnings(&path)?;
        tracing::debug!(path = %path.display(), warnings = warnings.len(), "loaded config");
        loaded = LoadedConfig {
            config,
            source: Some(path),
            warnings,
        };
    }

    loaded.config = with_env_overrides(loaded.config);
    Ok(loaded)
}

/// `<config_dir>/fleet-deploy/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fleet-deploy").join("config.toml"))
}

/// Apply environment variable overrides (FLEET_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

pub(crate) fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> Config {
    if let Some(path) = get_env("FLEET_SCRIPT_PATH") {
        config.deploy.script_path = path;
    }

    if let Some(mode) = get_env("FLEET_MODE") {
        match mode.parse::<RunMode>() {
            Ok(mode) => config.deploy.mode = mode,
            Err(e) => tracing::warn!(error = %e, "ignoring FLEET_MODE"),
        }
    }

    if let Some(val) = get_env("FLEET_CONTINUE_ON_FAILURE") {
        config.deploy.continue_on_failure = parse_flag(&val);
    }

    if let Some(val) = get_env("FLEET_REQUIRE_SETTINGS") {
        config.deploy.require_settings = parse_flag(&val);
    }

    if let Some(path) = get_env("FLEET_STAGING_ROOT") {
        config.paths.staging_root = PathBuf::from(path);
    }

    if let Some(path) = get_env("FLEET_SESSION_FILE") {
        config.paths.session_file = PathBuf::from(path);
    }

    if let Some(interpreter) = get_env("FLEET_INTERPRETER") {
        config.host.interpreter = interpreter;
    }

    config
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off" | ""
    )
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "deploy",
        "script_path",
        "unit_param",
        "mode",
        "continue_on_failure",
        "require_settings",
        "stage_configs",
        "paths",
        "staging_root",
        "session_file",
        "env_file",
        "env_local_file",
        "host",
        "interpreter",
        "interpreter_args",
        "actions",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
