//! Deployment Orchestrator
//!
//! Drives the unit lifecycle for a run:
//! 1. Validate the selection and pre-flight settings
//! 2. Queue every selected unit under one lock
//! 3. Execute sequentially or as one batch against the script host
//! 4. Record outcomes, history and learned templates
//!
//! The state lock is never held across a host call; the host may deliver log
//! lines from its own threads while the run thread is blocked in `execute`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::domain::entities::FleetSession;
use crate::domain::ports::{
    ConfigFileStore, HostError, HostLogLine, RunClaim, RunEvent, RunEventSink, ScriptHost,
    ScriptInvocation, SessionStore, SettingsStore, StopOutcome,
};
use crate::domain::services::config_resolver::{resolve_ips, ConfigLayers};
use crate::domain::services::settings_view::SettingsSnapshot;
use crate::domain::services::step_inference::annotate;
use crate::domain::services::template_learner::{learn_from_transition, learnable_overrides};
use crate::domain::services::LearnOutcome;
use crate::domain::value_objects::script_action::DEFAULT_UNIT_PARAM;
use crate::domain::value_objects::{
    LogEntry, RunMode, ScriptAction, UnitStatus, BATCH_UNIT, SCRIPT_UNIT, SYSTEM_UNIT,
};
use crate::error::{FleetError, FleetResult};

use super::cancel::{ActiveRunGuard, CancelHandle};
use super::options::{OrchestratorOptions, RunOptions};
use super::result::{ActionReport, RunReport, UnitOutcome};

/// Deployment orchestrator - owns the fleet session and runs deployments
///
/// Parameterized by its ports so tests can drive it with in-memory doubles.
/// Share it through `Arc` to cancel from another thread.
pub struct FleetOrchestrator<H, F, S, T>
where
    H: ScriptHost,
    F: ConfigFileStore,
    S: SettingsStore,
    T: SessionStore,
{
    pub(super) host: H,
    pub(super) files: F,
    pub(super) settings: S,
    pub(super) store: T,
    pub(super) options: OrchestratorOptions,
    state: Mutex<FleetSession>,
    active: AtomicBool,
    cancel: CancelHandle,
}

/// How one unit's script invocation ended
enum UnitResult {
    Succeeded,
    Failed { exit_code: Option<i32> },
    InvocationError(String),
}

impl<H, F, S, T> FleetOrchestrator<H, F, S, T>
where
    H: ScriptHost,
    F: ConfigFileStore,
    S: SettingsStore,
    T: SessionStore,
{
    /// Build around an already loaded session
    pub fn new(
        host: H,
        files: F,
        settings: S,
        store: T,
        options: OrchestratorOptions,
        session: FleetSession,
    ) -> Self {
        Self {
            host,
            files,
            settings,
            store,
            options,
            state: Mutex::new(session),
            active: AtomicBool::new(false),
            cancel: CancelHandle::new(),
        }
    }

    /// Load the stored session, settle units left mid-run by an earlier
    /// process and apply the IP overrides persisted in settings.
    ///
    /// Units of a run another process is still executing are left as stored.
    pub fn open(
        host: H,
        files: F,
        settings: S,
        store: T,
        options: OrchestratorOptions,
    ) -> FleetResult<Self> {
        let mut session = store.load()?;

        if store.run_in_progress()? {
            tracing::info!("another process is deploying; leaving its units untouched");
        } else {
            settle_interrupted(&mut session);
        }
        apply_ip_overrides(&mut session, &settings.snapshot()?);

        Ok(Self::new(host, files, settings, store, options, session))
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, FleetSession> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cloned view of the current session
    pub fn snapshot(&self) -> FleetSession {
        self.lock().clone()
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Handle that requests cancellation without touching the host
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Whether a run or script action is in progress
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Fails while this orchestrator or another process is running.
    pub(super) fn ensure_idle(&self) -> FleetResult<()> {
        if self.is_running() || self.store.run_in_progress()? {
            Err(FleetError::AlreadyRunning)
        } else {
            Ok(())
        }
    }

    /// Take the cross-process run lock.
    ///
    /// A session that still shows queued or running units was loaded while
    /// another process was deploying; it is reloaded and settled first.
    fn claim_run(&self) -> FleetResult<RunClaim> {
        let claim = self
            .store
            .try_claim_run()?
            .ok_or(FleetError::AlreadyRunning)?;

        let counts = self.lock().units.status_counts();
        if counts.queued + counts.running > 0 {
            tracing::debug!("session predates a finished run; reloading");
            let mut session = self.store.load()?;
            settle_interrupted(&mut session);
            apply_ip_overrides(&mut session, &self.settings.snapshot()?);
            *self.lock() = session;
            self.persist()?;
        }
        Ok(claim)
    }

    /// Request cancellation and ask the host to stop its in-flight process.
    ///
    /// A failed stop is logged as a warning; the run still winds down at the
    /// next cancellation check.
    pub fn cancel(&self) -> StopOutcome {
        self.cancel.cancel();
        tracing::info!("cancellation requested");
        self.lock().push_log(LogEntry::warning(
            SYSTEM_UNIT,
            "User requested cancellation. Stopping future tasks...",
        ));

        let outcome = self.host.stop();
        let message = if outcome.success {
            "Active process stopped.".to_string()
        } else if outcome.message.trim().is_empty() {
            "No active process to stop.".to_string()
        } else {
            outcome.message.clone()
        };
        self.lock()
            .push_log(LogEntry::warning(SYSTEM_UNIT, message));
        outcome
    }

    /// Deploy the selected units.
    ///
    /// Rejects before any state change on an empty selection, unknown IDs,
    /// missing required settings, or when another run is active.
    pub fn start_run(
        &self,
        selected_ids: &[String],
        options: &RunOptions,
        sink: &dyn RunEventSink,
    ) -> FleetResult<RunReport> {
        let ids = dedupe_ids(selected_ids);
        if ids.is_empty() {
            return Err(FleetError::validation("no units selected"));
        }

        let _guard = ActiveRunGuard::acquire(&self.active)?;
        let _claim = self.claim_run()?;

        let settings = self.settings.snapshot()?;
        if self.options.require_settings {
            let missing = settings.missing_required_keys();
            if !missing.is_empty() {
                return Err(FleetError::validation(format!(
                    "missing required settings: {}",
                    missing.join(", ")
                )));
            }
        }

        let action = self.options.deploy_action.clone();
        self.cancel.reset();
        self.queue_units(&ids, &action, options.mode, sink)?;

        tracing::info!(
            mode = %options.mode,
            units = ids.len(),
            script = %action.path,
            "run started"
        );

        let mut report = RunReport::new(options.mode);
        let result = if action.path.trim().is_empty() {
            Err(FleetError::system("no deploy script configured"))
        } else {
            match options.mode {
                RunMode::Sequential => {
                    self.run_sequential(&ids, &action, options, &settings, sink, &mut report)
                }
                RunMode::Batch => self.run_batch(&ids, &action, &settings, sink, &mut report),
            }
        };

        if let Err(FleetError::System(message)) = &result {
            if let Err(e) = self.skip_queued(&ids, sink) {
                tracing::warn!(error = %e, "failed to skip queued units after abort");
            }
            tracing::error!(error = %message, "run aborted");
            self.log(
                sink,
                LogEntry::error(SYSTEM_UNIT, format!("Run aborted: {message}")),
            );
            sink.on_event(RunEvent::SystemError {
                message: message.clone(),
            });
        }

        report.cancelled |= self.cancel.is_cancelled();
        report.outcomes = {
            let state = self.lock();
            ids.iter()
                .filter_map(|id| {
                    state.units.get(id).map(|unit| UnitOutcome {
                        unit_id: id.clone(),
                        status: unit.status(),
                    })
                })
                .collect()
        };

        self.log(sink, LogEntry::info(SYSTEM_UNIT, "Execution finished."));
        sink.on_event(RunEvent::RunCompleted {
            succeeded: report.succeeded(),
            failed: report.failed(),
            skipped: report.skipped(),
            cancelled: report.cancelled,
        });
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            cancelled = report.cancelled,
            "run finished"
        );
        self.persist_quietly();

        result.map(|()| report)
    }

    /// Run a catalogued script once. Unit statuses are not touched.
    pub fn run_action(
        &self,
        action_id: &str,
        unit_ids: &[String],
        sink: &dyn RunEventSink,
    ) -> FleetResult<ActionReport> {
        let action = self
            .options
            .find_action(action_id)
            .cloned()
            .ok_or_else(|| FleetError::validation(format!("unknown script action '{action_id}'")))?;
        if action.path.trim().is_empty() {
            return Err(FleetError::validation(format!(
                "script action '{}' has no script path",
                action.id
            )));
        }

        let ids = if action.requires_units {
            dedupe_ids(unit_ids)
        } else {
            Vec::new()
        };
        if action.requires_units && ids.is_empty() {
            return Err(FleetError::validation(
                "select at least one unit to run this script",
            ));
        }

        let _guard = ActiveRunGuard::acquire(&self.active)?;
        let _claim = self.claim_run()?;
        self.lock().units.ensure_known(&ids)?;
        let settings = self.settings.snapshot()?;
        self.cancel.reset();

        sink.on_event(RunEvent::ActionStarted {
            action_id: action.id.clone(),
            label: action.display_label().to_string(),
            unit_ids: ids.clone(),
        });
        self.log(
            sink,
            LogEntry::info(
                SCRIPT_UNIT,
                format!("Running script: {}", action.display_label()),
            ),
        );

        let invocation = ScriptInvocation::new(action.path.clone(), action.args_for(&ids))
            .with_env(settings.env_pairs());
        tracing::info!(action = %action.id, args = ?invocation.args, "script action started");
        let result = self
            .host
            .execute(&invocation, &|line| self.on_host_line(sink, SCRIPT_UNIT, line));

        let report = match result {
            Ok(outcome) => {
                let success = outcome.success && !self.cancel.is_cancelled();
                self.log(sink, exit_entry(SCRIPT_UNIT, success, outcome.exit_code));
                ActionReport {
                    action_id: action.id.clone(),
                    success,
                    exit_code: outcome.exit_code,
                }
            }
            Err(HostError::Invocation(message)) => {
                self.log(
                    sink,
                    LogEntry::error(SCRIPT_UNIT, FleetError::ExternalHost(message).to_string()),
                );
                ActionReport {
                    action_id: action.id.clone(),
                    success: false,
                    exit_code: None,
                }
            }
            Err(HostError::Unavailable(message)) => {
                let message = format!("script host unavailable: {message}");
                self.log(sink, LogEntry::error(SYSTEM_UNIT, message.clone()));
                sink.on_event(RunEvent::SystemError {
                    message: message.clone(),
                });
                self.persist_quietly();
                return Err(FleetError::System(message));
            }
        };

        sink.on_event(RunEvent::ActionCompleted {
            action_id: report.action_id.clone(),
            success: report.success,
        });
        self.persist_quietly();
        Ok(report)
    }

    /// Move every selected unit to `Queued` under one lock.
    fn queue_units(
        &self,
        ids: &[String],
        action: &ScriptAction,
        mode: RunMode,
        sink: &dyn RunEventSink,
    ) -> FleetResult<()> {
        let changes = {
            let mut state = self.lock();
            state.units.ensure_known(ids)?;
            for id in ids {
                if let Some(unit) = state.units.get(id) {
                    unit.status().transition(UnitStatus::Queued)?;
                }
            }
            let mut changes = Vec::with_capacity(ids.len());
            for id in ids {
                let from = state.units.transition(id, UnitStatus::Queued)?;
                changes.push((id.clone(), from));
            }
            changes
        };

        sink.on_event(RunEvent::RunStarted {
            mode,
            script: action.path.clone(),
            unit_ids: ids.to_vec(),
        });
        for (unit_id, from) in changes {
            sink.on_event(RunEvent::UnitStatusChanged {
                unit_id,
                from,
                to: UnitStatus::Queued,
            });
        }
        self.log(
            sink,
            LogEntry::info(
                SYSTEM_UNIT,
                format!("Starting deployment for {} units...", ids.len()),
            ),
        );
        self.log(
            sink,
            LogEntry::info(SYSTEM_UNIT, format!("Script: {}", action.path)),
        );
        self.persist_quietly();
        Ok(())
    }

    fn run_sequential(
        &self,
        ids: &[String],
        action: &ScriptAction,
        options: &RunOptions,
        settings: &SettingsSnapshot,
        sink: &dyn RunEventSink,
        report: &mut RunReport,
    ) -> FleetResult<()> {
        for (index, id) in ids.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.log(
                    sink,
                    LogEntry::warning(SYSTEM_UNIT, "Cancellation requested. Stopping sequence..."),
                );
                self.skip_queued(&ids[index..], sink)?;
                report.cancelled = true;
                return Ok(());
            }

            let span = tracing::info_span!("unit", unit = %id);
            let _enter = span.enter();

            let env = self.unit_environment(id, settings);
            if self.options.stage_configs {
                self.stage_unit_configs(id, settings, sink);
            }

            self.transition(id, UnitStatus::Running, sink)?;
            self.persist_quietly();
            let invocation =
                ScriptInvocation::new(action.path.clone(), action.args_for_unit(id)).with_env(env);
            let result = self
                .host
                .execute(&invocation, &|line| self.on_host_line(sink, id, line));
            let cancelled = self.cancel.is_cancelled();

            let outcome = match result {
                Ok(outcome) if outcome.success && !cancelled => UnitResult::Succeeded,
                Ok(outcome) => UnitResult::Failed {
                    exit_code: outcome.exit_code,
                },
                Err(HostError::Invocation(message)) => UnitResult::InvocationError(message),
                Err(HostError::Unavailable(message)) => {
                    self.transition(id, UnitStatus::Failed, sink)?;
                    return Err(FleetError::System(format!(
                        "script host unavailable: {message}"
                    )));
                }
            };

            let succeeded = matches!(outcome, UnitResult::Succeeded);
            match outcome {
                UnitResult::Succeeded => {
                    self.transition(id, UnitStatus::Success, sink)?;
                    self.log(sink, exit_entry(id, true, Some(0)));
                    if let Some(group) = self.learn_template(id, UnitStatus::Running, settings, sink)
                    {
                        report.templates_learned.push(group);
                    }
                }
                UnitResult::Failed { exit_code } => {
                    self.transition(id, UnitStatus::Failed, sink)?;
                    self.log(sink, exit_entry(id, false, exit_code));
                }
                UnitResult::InvocationError(message) => {
                    tracing::warn!(error = %message, "script invocation failed");
                    self.transition(id, UnitStatus::Failed, sink)?;
                    self.log(
                        sink,
                        LogEntry::error(id.as_str(), FleetError::ExternalHost(message).to_string()),
                    );
                }
            }

            self.persist_quietly();
            if succeeded {
                continue;
            }

            if cancelled {
                self.log(
                    sink,
                    LogEntry::warning(SYSTEM_UNIT, "Execution canceled by user."),
                );
                self.skip_queued(&ids[index + 1..], sink)?;
                report.cancelled = true;
                return Ok(());
            }
            if !options.continue_on_failure {
                self.log(
                    sink,
                    LogEntry::error(
                        SYSTEM_UNIT,
                        format!("Aborting sequence due to failure in unit {id}"),
                    ),
                );
                self.skip_queued(&ids[index + 1..], sink)?;
                report.aborted = true;
                return Ok(());
            }
        }
        Ok(())
    }

    fn run_batch(
        &self,
        ids: &[String],
        action: &ScriptAction,
        settings: &SettingsSnapshot,
        sink: &dyn RunEventSink,
        report: &mut RunReport,
    ) -> FleetResult<()> {
        if self.cancel.is_cancelled() {
            self.log(
                sink,
                LogEntry::warning(SYSTEM_UNIT, "Cancellation requested. Stopping sequence..."),
            );
            self.skip_queued(ids, sink)?;
            report.cancelled = true;
            return Ok(());
        }

        if self.options.stage_configs {
            for id in ids {
                self.stage_unit_configs(id, settings, sink);
            }
        }
        for id in ids {
            self.transition(id, UnitStatus::Running, sink)?;
        }
        self.persist_quietly();
        self.log(
            sink,
            LogEntry::info(
                BATCH_UNIT,
                format!("Initiating Batch Deployment for: {}", ids.join(", ")),
            ),
        );

        let param = action
            .unit_param
            .clone()
            .unwrap_or_else(|| DEFAULT_UNIT_PARAM.to_string());
        let invocation = ScriptInvocation::new(action.path.clone(), vec![param, ids.join(",")])
            .with_env(settings.env_pairs());
        let result = self
            .host
            .execute(&invocation, &|line| self.on_host_line(sink, BATCH_UNIT, line));
        let cancelled = self.cancel.is_cancelled();

        let success = match result {
            Ok(outcome) => outcome.success && !cancelled,
            Err(HostError::Invocation(message)) => {
                self.log(
                    sink,
                    LogEntry::error(BATCH_UNIT, FleetError::ExternalHost(message).to_string()),
                );
                false
            }
            Err(HostError::Unavailable(message)) => {
                for id in ids {
                    self.transition(id, UnitStatus::Failed, sink)?;
                }
                return Err(FleetError::System(format!(
                    "script host unavailable: {message}"
                )));
            }
        };

        let next = if success {
            UnitStatus::Success
        } else {
            UnitStatus::Failed
        };
        for id in ids {
            self.transition(id, next, sink)?;
        }

        if success {
            self.log(
                sink,
                LogEntry::success(BATCH_UNIT, "Batch process completed successfully."),
            );
            for id in ids {
                if let Some(group) = self.learn_template(id, UnitStatus::Running, settings, sink) {
                    if !report.templates_learned.contains(&group) {
                        report.templates_learned.push(group);
                    }
                }
            }
        } else {
            self.log(sink, LogEntry::error(BATCH_UNIT, "Batch process failed."));
            if cancelled {
                self.log(
                    sink,
                    LogEntry::warning(SYSTEM_UNIT, "Execution canceled by user."),
                );
                report.cancelled = true;
            }
        }
        Ok(())
    }

    /// Settings plus the unit's effective IPs, read from one snapshot.
    fn unit_environment(&self, id: &str, settings: &SettingsSnapshot) -> Vec<(String, String)> {
        let overrides = self
            .lock()
            .units
            .get(id)
            .map(|unit| unit.ip_overrides().clone())
            .unwrap_or_default();
        let mut env = settings.env_pairs();
        env.extend(resolve_ips(&overrides, &settings.defaults()).env_pairs());
        env
    }

    /// Write template and explicit overrides into the unit's staging files.
    fn stage_unit_configs(&self, id: &str, settings: &SettingsSnapshot, sink: &dyn RunEventSink) {
        let template = {
            let state = self.lock();
            state
                .units
                .get(id)
                .and_then(|unit| state.templates.get(&unit.normalized_group()).cloned())
        };
        let explicit = settings.unit_file_overrides(id);
        let files = match self.files.load_configs(id) {
            Ok(files) => files,
            Err(e) => {
                self.log(
                    sink,
                    LogEntry::warning(id, format!("Could not load config files: {e}")),
                );
                return;
            }
        };

        let layers = ConfigLayers::new(template.as_ref(), Some(&explicit));
        for resolved in layers.resolve_files(&files) {
            if let Some(error) = &resolved.error {
                self.log(sink, LogEntry::warning(id, error.to_string()));
                continue;
            }
            if !resolved.changed() {
                continue;
            }
            if let Err(e) = self.files.write(&resolved.file.path, &resolved.file.content) {
                self.log(
                    sink,
                    LogEntry::warning(
                        id,
                        format!("Could not stage {}: {e}", resolved.file.identity),
                    ),
                );
            }
        }
    }

    /// Feed a fresh success to the template learner; returns the group when
    /// its template changed.
    fn learn_template(
        &self,
        id: &str,
        previous: UnitStatus,
        settings: &SettingsSnapshot,
        sink: &dyn RunEventSink,
    ) -> Option<String> {
        let explicit = settings.unit_file_overrides(id);
        let loaded = if explicit.is_empty() {
            self.files.load_configs(id).unwrap_or_else(|e| {
                tracing::warn!(unit = %id, error = %e, "could not load config files for learning");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        let overrides = learnable_overrides(&explicit, &loaded);

        let outcome = {
            let mut state = self.lock();
            let unit = state.units.get(id)?.clone();
            learn_from_transition(&mut state.templates, &unit, previous, overrides, Utc::now())
        };

        let (group, created) = match outcome {
            LearnOutcome::Created { group } => (group, true),
            LearnOutcome::Updated { group } => (group, false),
            _ => return None,
        };
        sink.on_event(RunEvent::TemplateLearned {
            group: group.clone(),
            source_unit_id: id.to_string(),
            created,
        });
        self.log(
            sink,
            LogEntry::info(
                id,
                format!(
                    "Template {} for group {group}.",
                    if created { "created" } else { "updated" }
                ),
            ),
        );
        Some(group)
    }

    /// Every still-`Queued` unit in `ids` becomes `Skipped`.
    fn skip_queued(&self, ids: &[String], sink: &dyn RunEventSink) -> FleetResult<()> {
        for id in ids {
            let queued = self
                .lock()
                .units
                .get(id)
                .is_some_and(|unit| unit.status() == UnitStatus::Queued);
            if queued {
                self.transition(id, UnitStatus::Skipped, sink)?;
            }
        }
        Ok(())
    }

    /// Apply one lifecycle edge, record history and emit the change.
    fn transition(&self, id: &str, to: UnitStatus, sink: &dyn RunEventSink) -> FleetResult<UnitStatus> {
        let from = {
            let mut state = self.lock();
            let from = state.units.transition(id, to)?;
            state.record_history(id, to, Utc::now());
            from
        };
        tracing::debug!(unit = %id, %from, %to, "status changed");
        sink.on_event(RunEvent::UnitStatusChanged {
            unit_id: id.to_string(),
            from,
            to,
        });
        Ok(from)
    }

    /// Append to the session log and emit the entry.
    pub(super) fn log(&self, sink: &dyn RunEventSink, entry: LogEntry) {
        let event = RunEvent::Log {
            unit: entry.unit.clone(),
            message: entry.message.clone(),
            level: entry.level,
            step: None,
        };
        self.lock().push_log(entry);
        sink.on_event(event);
    }

    /// Attribute a host line to its `[unitId]` tag (or the fallback) and
    /// annotate it with the inferred step.
    fn on_host_line(&self, sink: &dyn RunEventSink, fallback_unit: &str, line: HostLogLine) {
        let (unit, step) = annotate(&line.message, line.level, fallback_unit);
        let unit = unit.to_string();

        self.lock().push_log(LogEntry {
            timestamp: line.timestamp,
            unit: unit.clone(),
            message: line.message.clone(),
            level: line.level,
        });
        if sink.wants_detailed_events() {
            sink.on_event(RunEvent::Log {
                unit,
                message: line.message,
                level: line.level,
                step,
            });
        }
    }

    /// Save the session, trimming the log first.
    pub(super) fn persist(&self) -> FleetResult<()> {
        let snapshot = {
            let mut state = self.lock();
            state.trim_logs();
            state.clone()
        };
        self.store.save(&snapshot)?;
        Ok(())
    }

    pub(super) fn persist_quietly(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    /// Mutate the session under the lock, then persist it.
    ///
    /// Refused while another process holds the run lock, since its saves
    /// would overwrite the change.
    pub(super) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut FleetSession) -> FleetResult<R>,
    ) -> FleetResult<R> {
        if !self.is_running() && self.store.run_in_progress()? {
            return Err(FleetError::AlreadyRunning);
        }
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state)?;
            state.trim_logs();
            (result, state.clone())
        };
        self.store.save(&snapshot)?;
        Ok(result)
    }
}

/// Settle units a dead process left queued or running.
fn settle_interrupted(session: &mut FleetSession) {
    let recovered = session.recover_interrupted();
    if recovered.is_empty() {
        return;
    }
    tracing::warn!(count = recovered.len(), "settled units from an interrupted run");
    session.push_log(LogEntry::warning(
        SYSTEM_UNIT,
        format!(
            "Recovered {} unit(s) from an interrupted run: {}",
            recovered.len(),
            recovered.join(", ")
        ),
    ));
}

fn apply_ip_overrides(session: &mut FleetSession, settings: &SettingsSnapshot) {
    for (unit_id, overrides) in settings.unit_ip_overrides() {
        if let Some(unit) = session.units.get_mut(&unit_id) {
            *unit.ip_overrides_mut() = overrides;
        }
    }
}

/// Exit message for a finished script
fn exit_entry(unit: &str, success: bool, exit_code: Option<i32>) -> LogEntry {
    if success {
        LogEntry::success(unit, "Process exited successfully.")
    } else {
        match exit_code {
            Some(code) => LogEntry::error(unit, format!("Process exited with error code {code}.")),
            None => LogEntry::error(unit, "Process exited with error code."),
        }
    }
}

/// Selection order with repeats removed
fn dedupe_ids(ids: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !unique.iter().any(|u| u == id) {
            unique.push(id.to_string());
        }
    }
    unique
}
