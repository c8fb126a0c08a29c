use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use fleet_deploy::domain::value_objects::{IpRole, RunMode};

/// fleet-deploy - deployment orchestration for fleets of field units
#[derive(Parser, Debug)]
#[command(name = "fleet-deploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events and JSON results
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Color output
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorWhen>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the unit registry
    Units {
        #[command(subcommand)]
        action: UnitsCommand,
    },

    /// Replace the selection used by `deploy`
    Select {
        /// Unit IDs to select
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Manage selection presets
    Preset {
        #[command(subcommand)]
        action: PresetCommand,
    },

    /// Deploy units (the selection, unless IDs are given). Ctrl-C cancels.
    Deploy {
        /// Units to deploy instead of the current selection
        ids: Vec<String>,

        /// Dispatch mode
        #[arg(short, long, value_enum)]
        mode: Option<RunMode>,

        /// Keep going after a unit fails (sequential mode)
        #[arg(long)]
        continue_on_failure: bool,

        /// Script to run instead of the configured deploy script
        #[arg(long)]
        script: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Reset a failed unit so the next deploy picks it up again
    Retry {
        /// Failed unit ID
        id: String,
    },

    /// Run a script from the action catalogue. Ctrl-C cancels.
    RunAction {
        /// Action ID (omit to list the catalogue)
        action: Option<String>,

        /// Units passed to the script (defaults to the selection)
        #[arg(short, long, value_delimiter = ',')]
        units: Vec<String>,
    },

    /// Import units from a saved extraction response
    Import {
        /// JSON response from the dashboard reader
        file: PathBuf,
    },

    /// Per-unit IP overrides
    Ip {
        #[command(subcommand)]
        action: IpCommand,
    },

    /// Per-unit config files in the staging tree
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// List learned group templates
    Templates,

    /// Show the last recorded outcome per unit
    History,

    /// Session log
    Logs {
        #[command(subcommand)]
        action: LogsCommand,
    },

    /// General settings in .env / .env.local
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Session maintenance
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UnitsCommand {
    /// Register units (whitespace or comma separated IDs)
    Add {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Group to assign
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Remove units from the registry
    Remove {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// List registered units
    List,

    /// Assign a group (omit the group to clear it)
    Group {
        /// Group name; blank or "Unassigned" clears
        #[arg(short, long)]
        group: Option<String>,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Toggle the reviewed mark on an extracted unit
    Verify { id: String },

    /// List extracted units that still need review
    Review,
}

#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// Save units (default: the selection) under a name
    Save {
        name: String,
        ids: Vec<String>,
    },

    /// Save every unit of a group as a preset named after it
    SaveGroup { group: String },

    /// Select a preset's units
    Apply { name: String },

    /// Delete a preset
    Remove { name: String },

    /// List presets
    List,
}

#[derive(Subcommand, Debug)]
pub enum IpCommand {
    /// Set one IP override (an empty value or the default removes it)
    Set {
        id: String,
        #[arg(value_enum)]
        role: IpRole,
        value: String,
    },

    /// Show effective IPs for a unit
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show a unit's config files with its explicit overrides applied
    Show {
        id: String,

        /// Preview the group template too, as a diff
        #[arg(long)]
        template: bool,
    },

    /// List every editable file in a unit's staging tree
    Files { id: String },

    /// Print one staged file
    Cat { id: String, identity: String },

    /// Replace one unit.config with the content of a local file
    Write {
        id: String,
        identity: String,
        /// File holding the new JSON content
        #[arg(long)]
        from: PathBuf,
    },

    /// Store the unit's current unit.config values as its explicit overrides
    SaveOverrides { id: String },

    /// Write the group template into the unit's config files
    ApplyTemplate {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// Print the session log
    Show {
        /// Only the last N entries
        #[arg(short = 'n', long)]
        tail: Option<usize>,
    },

    /// Write the session log to a file
    Export {
        /// Target file (default: deploy_log_<timestamp>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List general settings (secrets are never shown)
    List,

    /// Set a general setting
    Set { key: String, value: String },

    /// Remove a general setting
    Unset { key: String },

    /// Report required settings that are missing
    Check,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Drop units, selection, logs and review marks
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
