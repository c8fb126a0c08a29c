//! Domain services
//!
//! Pure logic over entities and value objects. No I/O.

pub mod config_diff;
pub mod config_resolver;
pub mod settings_view;
pub mod step_inference;
pub mod template_learner;

pub use config_diff::{unified_diff, ConfigDiff, DiffLine, DiffTag};
pub use config_resolver::{
    apply_ip_override, capture_file_overrides, changed_keys, derive_file_overrides, effective_ip,
    merge_json, resolve_ips, ConfigLayers, DefaultIps, EffectiveIps, ResolvedFile,
};
pub use settings_view::{SettingsSnapshot, REQUIRED_KEYS, SECRET_KEY};
pub use step_inference::{annotate, infer_step, DeployStep};
pub use template_learner::{learn_from_transition, learnable_overrides, LearnOutcome};
