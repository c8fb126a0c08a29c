//! Staging Tree
//!
//! File-backed config store over the per-unit staging directories the
//! download scripts populate.

mod store;

pub use store::{StagingConfigStore, EDITABLE_EXTENSIONS, OVERRIDES_DIR, UNIT_CONFIG_FILE};
