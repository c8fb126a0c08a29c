//! fleet-deploy CLI - deployment orchestration for fleets of field units
//!
//! Usage: fleet-deploy <COMMAND>
//!
//! Commands:
//!   units       Register, group, review and list units
//!   select      Replace the deploy selection
//!   deploy      Run the deploy script over the selection
//!   run-action  Run a catalogued script
//!   config      Inspect and edit per-unit config files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::context::AppContext;
use commands::deploy::DeployArgs;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "FLEET_LOG";

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = AppContext::load(cli.root.as_deref(), cli.json, cli.verbose, cli.color)?;

    match cli.command {
        Commands::Units { action } => commands::units::cmd_units(&ctx, action),
        Commands::Select { ids } => commands::units::cmd_select(&ctx, &ids),
        Commands::Preset { action } => commands::presets::cmd_preset(&ctx, action),
        Commands::Deploy {
            ids,
            mode,
            continue_on_failure,
            script,
            yes,
        } => commands::deploy::cmd_deploy(
            &ctx,
            DeployArgs {
                ids,
                mode,
                continue_on_failure,
                script,
                yes,
            },
        ),
        Commands::Retry { id } => commands::units::cmd_retry(&ctx, &id),
        Commands::RunAction { action, units } => {
            commands::actions::cmd_run_action(&ctx, action.as_deref(), &units)
        }
        Commands::Import { file } => commands::import::cmd_import(&ctx, &file),
        Commands::Ip { action } => commands::ip::cmd_ip(&ctx, action),
        Commands::Config { action } => commands::config::cmd_config(&ctx, action),
        Commands::Templates => commands::config::cmd_templates(&ctx),
        Commands::History => commands::config::cmd_history(&ctx),
        Commands::Logs { action } => commands::session::cmd_logs(&ctx, action),
        Commands::Settings { action } => commands::settings::cmd_settings(&ctx, action),
        Commands::Session { action } => commands::session::cmd_session(&ctx, action),
    }
}
