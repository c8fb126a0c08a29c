//! Common test utilities for fleet-deploy scenario tests.
//!
//! `TestEnv` is an isolated project plus home directory with helpers to
//! write configuration, settings, staged unit files and a `sh` deploy
//! script, and to run the CLI against them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse every non-empty stdout line as JSON
    pub fn json_lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON ({e}): {l}"))
            })
            .collect()
    }

    /// The only JSON object printed on stdout
    pub fn json(&self) -> Value {
        let mut lines = self.json_lines();
        assert_eq!(lines.len(), 1, "expected one JSON line, got:\n{}", self.stdout);
        lines.remove(0)
    }
}

pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
}

/// Required settings minus the secret
pub const REQUIRED_ENV: &str = "LinuxHost=10.0.0.2\n\
LinuxUser=deploy\n\
LinuxPassword=hunter2\n\
MPC_DataVanHMIIp=10.1.0.1\n\
MPC_LocalHMIIp=10.1.0.2\n";

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("project tempdir"),
            home_dir: TempDir::new().expect("home tempdir"),
        }
    }

    /// Project configured to run `scripts/deploy.sh` through `sh`
    pub fn with_sh_deploy(script: &str) -> Self {
        let env = Self::new();
        env.write(
            "fleet.toml",
            r#"[deploy]
script_path = "scripts/deploy.sh"
unit_param = "--unit"

[host]
interpreter = "sh"
interpreter_args = []
"#,
        );
        env.write("scripts/deploy.sh", script);
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap_or_default()
    }

    /// Every required setting, with the secret in `.env.local`
    pub fn write_required_settings(&self) {
        self.write(".env", REQUIRED_ENV);
        self.write(".env.local", "PAT=secret-token\n");
    }

    /// `staging/<unit>/<relative>`
    pub fn stage(&self, unit: &str, relative: &str, content: &str) {
        self.write(&format!("staging/{unit}/{relative}"), content);
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_fleet-deploy"))
            .current_dir(cwd)
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("USERPROFILE", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("FLEET_LOG")
            .env_remove("FLEET_MODE")
            .env_remove("FLEET_SCRIPT_PATH")
            .output()
            .expect("failed to run fleet-deploy");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Run and require success
    pub fn ok(&self, args: &[&str]) -> TestResult {
        let result = self.run(args);
        assert!(
            result.success,
            "`fleet-deploy {}` failed:\n{}",
            args.join(" "),
            result.combined_output()
        );
        result
    }

    /// Status per unit from `units list --json`
    pub fn statuses(&self) -> Vec<(String, String)> {
        let listed = self.ok(&["units", "list", "--json"]).json();
        listed["units"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| {
                (
                    u["id"].as_str().unwrap().to_string(),
                    u["status"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}
