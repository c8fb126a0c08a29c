//! Domain entities

pub mod config_file;
pub mod preset;
pub mod registry;
pub mod session;
pub mod template;
pub mod unit;

pub use config_file::{ConfigFile, FileRef};
pub use preset::Preset;
pub use registry::{StatusCounts, UnitRegistry};
pub use session::{FleetSession, HistoryEntry};
pub use template::{FieldOverrides, FileOverrides, GroupTemplate};
pub use unit::{is_valid_unit_id, parse_unit_list, Unit, UnitSource};
