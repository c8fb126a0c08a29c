//! Run mode value object

use serde::{Deserialize, Serialize};

/// How a deployment run dispatches its units to the script host
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One host invocation per unit, in selection order
    #[default]
    Sequential,
    /// A single host invocation covering every selected unit
    Batch,
}

impl RunMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RunMode::Sequential => "sequential",
            RunMode::Batch => "batch",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(RunMode::Sequential),
            "batch" => Ok(RunMode::Batch),
            other => Err(format!(
                "unknown run mode '{other}' (expected 'sequential' or 'batch')"
            )),
        }
    }
}
