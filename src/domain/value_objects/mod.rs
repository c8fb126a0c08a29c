//! Value objects
//!
//! Small immutable types shared by entities, services and ports.

pub mod group;
pub mod ip_role;
pub mod log_entry;
pub mod run_mode;
pub mod script_action;
pub mod unit_status;

pub use group::{normalize_group, normalize_group_input, UNASSIGNED_GROUP};
pub use ip_role::{IpOverrides, IpRole};
pub use log_entry::{is_pseudo_unit, LogEntry, LogLevel, BATCH_UNIT, SCRIPT_UNIT, SYSTEM_UNIT};
pub use run_mode::RunMode;
pub use script_action::{default_catalog, default_deploy_action, ArgStyle, ScriptAction};
pub use unit_status::UnitStatus;
