//! Deploy command handler
//!
//! Runs the deploy script over the selection (or explicit IDs) and streams
//! progress as console lines or NDJSON. Ctrl-C cancels the run.

use std::sync::Arc;

use anyhow::{Context, Result};

use fleet_deploy::domain::ports::RunEventSink;
use fleet_deploy::domain::value_objects::RunMode;
use fleet_deploy::infrastructure::JsonEventSink;
use fleet_deploy::presentation::ConcreteOrchestrator;
use fleet_deploy::RunOptions;

use crate::commands::context::AppContext;
use crate::ui::prompt::confirm;
use crate::ui::views::run::ConsoleRunSink;

/// Command-line choices for one deploy invocation
pub struct DeployArgs {
    pub ids: Vec<String>,
    pub mode: Option<RunMode>,
    pub continue_on_failure: bool,
    pub script: Option<String>,
    pub yes: bool,
}

/// Route Ctrl-C to the orchestrator's cancel path
pub(crate) fn install_cancel_handler(orchestrator: &Arc<ConcreteOrchestrator>) -> Result<()> {
    let orchestrator = Arc::clone(orchestrator);
    ctrlc::set_handler(move || {
        let outcome = orchestrator.cancel();
        tracing::debug!(stopped = outcome.success, message = %outcome.message, "ctrl-c");
    })
    .context("failed to install Ctrl-C handler")
}

pub(crate) fn run_sink(ctx: &AppContext, command: &'static str) -> Box<dyn RunEventSink> {
    if ctx.ui.json {
        Box::new(JsonEventSink::stdout(command))
    } else {
        Box::new(ConsoleRunSink::new(ctx.ui))
    }
}

fn run_options(ctx: &AppContext, args: &DeployArgs) -> RunOptions {
    let deploy = &ctx.config().deploy;
    RunOptions::new(args.mode.unwrap_or(deploy.mode))
        .with_continue_on_failure(args.continue_on_failure || deploy.continue_on_failure)
}

pub fn cmd_deploy(ctx: &AppContext, args: DeployArgs) -> Result<()> {
    let mut config = ctx.config().clone();
    if let Some(script) = &args.script {
        config.deploy.script_path = script.clone();
    }
    let orchestrator = ctx.orchestrator_with(&config)?;

    let ids = if args.ids.is_empty() {
        orchestrator.snapshot().selected
    } else {
        args.ids.clone()
    };
    let options = run_options(ctx, &args);

    if !ids.is_empty() {
        let prompt = format!(
            "Deploy {} unit(s) [{}] with {}?",
            ids.len(),
            options.mode,
            orchestrator.options().deploy_action.path
        );
        if !confirm(&ctx.ui, &prompt, args.yes)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    install_cancel_handler(&orchestrator)?;
    let sink = run_sink(ctx, "deploy");
    let report = orchestrator.start_run(&ids, &options, sink.as_ref())?;

    if !ctx.ui.json && !report.templates_learned.is_empty() {
        println!(
            "Learned template(s) for: {}",
            report.templates_learned.join(", ")
        );
    }
    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
