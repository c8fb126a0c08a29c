//! Shared setup for command handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use fleet_deploy::config::{self, Config, ConfigWarning, LoadedConfig};
use fleet_deploy::presentation::{create_orchestrator, ConcreteOrchestrator};

use crate::cli::ColorWhen;
use crate::commands::project_root::discover_project_root;
use crate::ui::context::UiContext;
use crate::ui::theme::{self, colors};

/// Project root, layered config and output settings for one invocation
pub struct AppContext {
    pub root: PathBuf,
    pub loaded: LoadedConfig,
    pub ui: UiContext,
}

impl AppContext {
    pub fn load(
        root: Option<&Path>,
        json: bool,
        verbose: u8,
        color: Option<ColorWhen>,
    ) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => {
                let cwd = std::env::current_dir().context("failed to read current directory")?;
                discover_project_root(&cwd)
            }
        };
        let loaded = config::load_layered(&root)
            .with_context(|| format!("failed to load configuration for {}", root.display()))?;
        let ui = UiContext::new(json, verbose, color);

        let ctx = Self { root, loaded, ui };
        ctx.report_warnings();
        Ok(ctx)
    }

    pub fn config(&self) -> &Config {
        &self.loaded.config
    }

    fn report_warnings(&self) {
        for warning in &self.loaded.warnings {
            tracing::warn!(key = %warning.key, file = %warning.file.display(), "unknown config key");
            if !self.ui.json {
                eprintln!("{}", format_warning(warning, self.ui.color));
            }
        }
    }

    /// Orchestrator over the loaded configuration
    pub fn orchestrator(&self) -> Result<Arc<ConcreteOrchestrator>> {
        self.orchestrator_with(self.config())
    }

    /// Orchestrator over an adjusted copy of the configuration
    pub fn orchestrator_with(&self, config: &Config) -> Result<Arc<ConcreteOrchestrator>> {
        let orchestrator = create_orchestrator(&self.root, config)
            .with_context(|| format!("failed to open project at {}", self.root.display()))?;
        Ok(Arc::new(orchestrator))
    }

    /// Print a JSON value as one line
    pub fn emit_json(&self, value: serde_json::Value) {
        println!("{value}");
    }
}

fn format_warning(warning: &ConfigWarning, color: bool) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{line}", warning.file.display()),
        None => warning.file.display().to_string(),
    };
    let mut text = format!("warning: unknown config key '{}' in {location}", warning.key);
    if let Some(suggestion) = &warning.suggestion {
        text.push_str(&format!(" (did you mean '{suggestion}'?)"));
    }
    theme::paint(&text, colors::WARNING, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_mentions_line_and_suggestion() {
        let warning = ConfigWarning {
            key: "script_pth".into(),
            file: PathBuf::from("fleet.toml"),
            line: Some(2),
            suggestion: Some("script_path".into()),
        };
        assert_eq!(
            format_warning(&warning, false),
            "warning: unknown config key 'script_pth' in fleet.toml:2 (did you mean 'script_path'?)"
        );
    }

    #[test]
    fn warning_without_line_uses_file_only() {
        let warning = ConfigWarning {
            key: "extra".into(),
            file: PathBuf::from("fleet.toml"),
            line: None,
            suggestion: None,
        };
        assert_eq!(
            format_warning(&warning, false),
            "warning: unknown config key 'extra' in fleet.toml"
        );
    }
}
