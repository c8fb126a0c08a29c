//! IP role value object - the named address fields a unit can override

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named IP field a unit's deployment consumes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum IpRole {
    /// DataVan HMI address
    #[serde(alias = "dataVanHmiIp")]
    DataVanHmi,
    /// Local HMI address
    #[serde(alias = "localHmiIp")]
    LocalHmi,
    /// Secondary MPC address (optional in most deployments)
    #[serde(alias = "mpcSecondaryIp")]
    MpcSecondary,
}

/// Per-unit IP overrides. An empty map means "use defaults".
pub type IpOverrides = BTreeMap<IpRole, String>;

impl IpRole {
    pub const ALL: [IpRole; 3] = [IpRole::DataVanHmi, IpRole::LocalHmi, IpRole::MpcSecondary];

    /// Settings key holding the process-wide default for this role
    pub const fn settings_key(&self) -> &'static str {
        match self {
            IpRole::DataVanHmi => "MPC_DataVanHMIIp",
            IpRole::LocalHmi => "MPC_LocalHMIIp",
            IpRole::MpcSecondary => "MPC_MPCSecondaryIp",
        }
    }

    /// Match a settings key (case-insensitive) back to its role
    pub fn from_settings_key(key: &str) -> Option<IpRole> {
        Self::ALL
            .into_iter()
            .find(|role| role.settings_key().eq_ignore_ascii_case(key))
    }

    /// Settings key holding one unit's override for this role
    pub fn unit_settings_key(&self, unit_id: &str) -> String {
        format!("UNIT_{}_{}", unit_id, self.settings_key())
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            IpRole::DataVanHmi => "DataVan HMI",
            IpRole::LocalHmi => "Local HMI",
            IpRole::MpcSecondary => "MPC Secondary",
        }
    }
}

impl std::fmt::Display for IpRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
