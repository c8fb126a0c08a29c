//! Script actions - catalogued scripts the host can run and how units are passed to them

use serde::{Deserialize, Serialize};

/// How unit IDs are rendered onto a script's command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgStyle {
    /// `-Param a,b,c`
    Comma,
    /// `-Param a b c`
    Repeat,
    /// No unit arguments at all
    #[default]
    None,
}

/// A catalogued script invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptAction {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub unit_param: Option<String>,
    #[serde(default)]
    pub arg_style: ArgStyle,
    #[serde(default)]
    pub requires_units: bool,
}

impl ScriptAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
            unit_param: None,
            arg_style: ArgStyle::None,
            requires_units: false,
        }
    }

    /// Require units and pass them with `param` in the given style
    pub fn with_units(mut self, param: impl Into<String>, style: ArgStyle) -> Self {
        self.unit_param = Some(param.into());
        self.arg_style = style;
        self.requires_units = true;
        self
    }

    /// Command-line arguments carrying `unit_ids`
    pub fn args_for(&self, unit_ids: &[String]) -> Vec<String> {
        let Some(param) = self.unit_param.as_deref() else {
            return Vec::new();
        };
        if unit_ids.is_empty() {
            return Vec::new();
        }
        match self.arg_style {
            ArgStyle::Comma => vec![param.to_string(), unit_ids.join(",")],
            ArgStyle::Repeat => std::iter::once(param.to_string())
                .chain(unit_ids.iter().cloned())
                .collect(),
            ArgStyle::None => Vec::new(),
        }
    }

    /// Arguments for a single-unit invocation (sequential runs)
    pub fn args_for_unit(&self, unit_id: &str) -> Vec<String> {
        match self.unit_param.as_deref() {
            Some(param) if self.arg_style != ArgStyle::None => {
                vec![param.to_string(), unit_id.to_string()]
            }
            _ => Vec::new(),
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Default deploy script
pub const DEFAULT_DEPLOY_SCRIPT: &str = "./scripts/Deploy-UpdatedUnits.ps1";

/// Default unit parameter for deploy-style scripts
pub const DEFAULT_UNIT_PARAM: &str = "-UnitNumber";

/// The deploy action used by `start_run` unless configured otherwise
pub fn default_deploy_action() -> ScriptAction {
    ScriptAction::new("deploy", "Deploy Selected", DEFAULT_DEPLOY_SCRIPT)
        .with_units(DEFAULT_UNIT_PARAM, ArgStyle::Comma)
}

/// Built-in script catalogue
pub fn default_catalog() -> Vec<ScriptAction> {
    vec![
        default_deploy_action(),
        ScriptAction::new("download", "Download Unit Files", "./scripts/Download-AdoUnit.ps1")
            .with_units(DEFAULT_UNIT_PARAM, ArgStyle::Repeat),
        ScriptAction::new(
            "update-config",
            "Update Unit Configs",
            "./scripts/Update-MPC-UnitConfig.ps1",
        )
        .with_units(DEFAULT_UNIT_PARAM, ArgStyle::Repeat),
        ScriptAction::new("upload", "Upload Unit Files", "./scripts/Upload-AdoUnit.ps1")
            .with_units(DEFAULT_UNIT_PARAM, ArgStyle::Repeat),
        ScriptAction::new("get-etc", "Get Etc Files", "./scripts/Get-AdoEtcFiles.ps1")
            .with_units("-UnitNumbers", ArgStyle::Repeat),
        ScriptAction::new("build", "Build Staging Units", "./scripts/Build-AdoUnits.ps1"),
        ScriptAction::new(
            "inject-compose",
            "Inject Docker Compose",
            "./scripts/Inject-DockerCompose.ps1",
        ),
        ScriptAction::new(
            "generate-compose",
            "Generate Docker Compose",
            "./scripts/Generate-DockerCompose.ps1",
        ),
        ScriptAction::new("fetch", "Fetch (ADO Scan)", "./scripts/Fetch.ps1"),
    ]
}
