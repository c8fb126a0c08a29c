//! Process Script Host
//!
//! Runs deployment scripts through an interpreter (PowerShell by default)
//! as a child process. Stdout lines are reported as `INFO`, stderr lines as
//! `ERROR`; blank lines are dropped.
//!
//! On Unix the script leads its own process group and `stop` signals the
//! whole group, so helpers it spawned go down with it.

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::config::HostConfig;
use crate::domain::ports::{
    ExecOutcome, HostError, HostLogLine, ScriptHost, ScriptInvocation, StopOutcome,
};
use crate::domain::value_objects::LogLevel;
use crate::infrastructure::fs::read_env_file;

pub struct ProcessScriptHost {
    interpreter: String,
    interpreter_args: Vec<String>,
    working_dir: PathBuf,
    /// `.env` files loaded into the child environment before the invocation's own pairs
    env_files: Vec<PathBuf>,
    active: Mutex<Option<u32>>,
}

impl ProcessScriptHost {
    pub fn new(interpreter: impl Into<String>, interpreter_args: Vec<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            interpreter_args,
            working_dir: PathBuf::from("."),
            env_files: Vec::new(),
            active: Mutex::new(None),
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(config.interpreter.clone(), config.interpreter_args.clone())
    }

    /// Directory relative script paths resolve against and the child starts in
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Later files win over earlier ones. The secret travels this way.
    pub fn with_env_files(mut self, files: Vec<PathBuf>) -> Self {
        self.env_files = files;
        self
    }

    fn active(&self) -> MutexGuard<'_, Option<u32>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn script_path(&self, script: &str) -> PathBuf {
        let path = Path::new(script);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    fn command(&self, invocation: &ScriptInvocation) -> Result<Command, HostError> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.args(&self.interpreter_args)
            .arg(self.script_path(&invocation.script))
            .args(&invocation.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        for file in &self.env_files {
            let pairs = read_env_file(file).map_err(|e| {
                HostError::Invocation(format!("failed to read {}: {e}", file.display()))
            })?;
            cmd.envs(pairs);
        }
        cmd.envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(cmd)
    }
}

fn forward_lines<R: Read>(reader: R, level: LogLevel, on_log: &(dyn Fn(HostLogLine) + Sync)) {
    for line in BufReader::new(reader).lines() {
        match line {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => on_log(HostLogLine::new(line.trim_end(), level)),
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading script output");
                break;
            }
        }
    }
}

impl ScriptHost for ProcessScriptHost {
    fn execute(
        &self,
        invocation: &ScriptInvocation,
        on_log: &(dyn Fn(HostLogLine) + Sync),
    ) -> Result<ExecOutcome, HostError> {
        let mut cmd = self.command(invocation)?;
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HostError::Unavailable(format!("{}: {e}", self.interpreter)));
            }
            Err(e) => return Err(HostError::Invocation(e.to_string())),
        };

        let pid = child.id();
        *self.active() = Some(pid);
        tracing::debug!(pid, script = %invocation.script, args = ?invocation.args, "script started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        thread::scope(|scope| {
            if let Some(out) = stdout {
                scope.spawn(move || forward_lines(out, LogLevel::Info, on_log));
            }
            if let Some(err) = stderr {
                scope.spawn(move || forward_lines(err, LogLevel::Error, on_log));
            }
        });

        let status = child.wait();
        {
            let mut active = self.active();
            if *active == Some(pid) {
                *active = None;
            }
        }

        let status = status.map_err(|e| HostError::Invocation(e.to_string()))?;
        tracing::debug!(pid, code = ?status.code(), "script exited");
        if status.success() {
            Ok(ExecOutcome::success())
        } else {
            Ok(ExecOutcome::failure(status.code()))
        }
    }

    fn stop(&self) -> StopOutcome {
        let Some(pid) = *self.active() else {
            return StopOutcome {
                success: false,
                message: "No active process.".to_string(),
            };
        };

        let result = if cfg!(windows) {
            Command::new("taskkill")
                .args(["/pid", &pid.to_string(), "/T", "/F"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        } else {
            Command::new("kill")
                .args(["-TERM", "--", &format!("-{pid}")])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        };

        match result {
            Ok(status) if status.success() => {
                tracing::info!(pid, "script process stopped");
                StopOutcome {
                    success: true,
                    message: "Active process stopped.".to_string(),
                }
            }
            Ok(status) => StopOutcome {
                success: false,
                message: format!("Failed to stop process {pid} ({status})."),
            },
            Err(e) => StopOutcome {
                success: false,
                message: format!("Failed to stop process {pid}: {e}"),
            },
        }
    }
}
