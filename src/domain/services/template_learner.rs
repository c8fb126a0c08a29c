//! Template learning
//!
//! Observes a unit's transition into `Success` and records its configuration
//! as the template for the unit's group.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::template::canonical_json;
use crate::domain::entities::{ConfigFile, FileOverrides, GroupTemplate, Unit};
use crate::domain::services::config_resolver::derive_file_overrides;
use crate::domain::value_objects::UnitStatus;

/// What a learning observation did to the template set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnOutcome {
    /// Not a fresh transition into `Success`
    NotTriggered,
    /// Neither explicit overrides nor parseable config files were available
    NoOverrides,
    /// Existing template already holds identical overrides
    Unchanged { group: String },
    Created { group: String },
    Updated { group: String },
}

impl LearnOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, LearnOutcome::Created { .. } | LearnOutcome::Updated { .. })
    }
}

/// Whether `previous -> current` should trigger learning
pub fn is_fresh_success(previous: UnitStatus, current: UnitStatus) -> bool {
    current == UnitStatus::Success && previous != UnitStatus::Success
}

/// Overrides a successful unit contributes: its explicit overrides when
/// present, otherwise whatever its loaded config files parse to.
pub fn learnable_overrides(explicit: &FileOverrides, loaded: &[ConfigFile]) -> FileOverrides {
    if explicit.is_empty() {
        derive_file_overrides(loaded)
    } else {
        explicit.clone()
    }
}

/// Upsert the template for `unit`'s normalized group after a status change.
pub fn learn_from_transition(
    templates: &mut BTreeMap<String, GroupTemplate>,
    unit: &Unit,
    previous: UnitStatus,
    overrides: FileOverrides,
    now: DateTime<Utc>,
) -> LearnOutcome {
    if !is_fresh_success(previous, unit.status()) {
        return LearnOutcome::NotTriggered;
    }
    if overrides.is_empty() {
        return LearnOutcome::NoOverrides;
    }

    let group = unit.normalized_group();
    let existed = match templates.get(&group) {
        Some(existing)
            if canonical_json(&existing.config_overrides) == canonical_json(&overrides) =>
        {
            return LearnOutcome::Unchanged { group };
        }
        Some(_) => true,
        None => false,
    };

    templates.insert(
        group.clone(),
        GroupTemplate {
            source_unit_id: unit.id().to_string(),
            updated_at: now,
            config_overrides: overrides,
        },
    );
    tracing::debug!(group = %group, unit = %unit.id(), "learned group template");

    if existed {
        LearnOutcome::Updated { group }
    } else {
        LearnOutcome::Created { group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn successful_unit(group: Option<&str>) -> Unit {
        let mut unit = Unit::manual("621001")
            .unwrap()
            .with_group(group.map(str::to_string));
        unit.apply_transition(UnitStatus::Queued).unwrap();
        unit.apply_transition(UnitStatus::Running).unwrap();
        unit.apply_transition(UnitStatus::Success).unwrap();
        unit
    }

    fn overrides(value: serde_json::Value) -> FileOverrides {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn fresh_success_creates_template() {
        let mut templates = BTreeMap::new();
        let unit = successful_unit(Some("North"));
        let outcome = learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Running,
            overrides(json!({"unit.config": {"a": 1}})),
            Utc::now(),
        );
        assert_eq!(outcome, LearnOutcome::Created { group: "North".into() });
        assert_eq!(templates["North"].source_unit_id, "621001");
    }

    #[test]
    fn repeated_success_is_a_noop() {
        let mut templates = BTreeMap::new();
        let unit = successful_unit(None);
        let outcome = learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Success,
            overrides(json!({"unit.config": {"a": 1}})),
            Utc::now(),
        );
        assert_eq!(outcome, LearnOutcome::NotTriggered);
        assert!(templates.is_empty());
    }

    #[test]
    fn identical_overrides_do_not_touch_template() {
        let mut templates = BTreeMap::new();
        let unit = successful_unit(None);
        let first = Utc::now();
        learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Running,
            overrides(json!({"unit.config": {"a": 1, "b": 2}})),
            first,
        );
        let outcome = learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Running,
            overrides(json!({"unit.config": {"b": 2, "a": 1}})),
            first + chrono::Duration::seconds(60),
        );
        assert_eq!(outcome, LearnOutcome::Unchanged { group: "Unassigned".into() });
        assert_eq!(templates["Unassigned"].updated_at, first);
    }

    #[test]
    fn different_overrides_update_template() {
        let mut templates = BTreeMap::new();
        let unit = successful_unit(Some("West"));
        learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Running,
            overrides(json!({"unit.config": {"a": 1}})),
            Utc::now(),
        );
        let outcome = learn_from_transition(
            &mut templates,
            &unit,
            UnitStatus::Failed,
            overrides(json!({"unit.config": {"a": 2}})),
            Utc::now(),
        );
        assert!(outcome.changed());
        assert_eq!(templates["West"].config_overrides["unit.config"]["a"], 2);
    }

    #[test]
    fn empty_overrides_do_not_create_templates() {
        let mut templates = BTreeMap::new();
        let outcome = learn_from_transition(
            &mut templates,
            &successful_unit(None),
            UnitStatus::Running,
            FileOverrides::new(),
            Utc::now(),
        );
        assert_eq!(outcome, LearnOutcome::NoOverrides);
    }

    #[test]
    fn explicit_overrides_take_priority_over_loaded_files() {
        let loaded = vec![ConfigFile {
            identity: "unit.config".into(),
            path: PathBuf::from("/s/unit.config"),
            content: r#"{"from":"file"}"#.into(),
        }];
        let explicit = overrides(json!({"unit.config": {"from": "explicit"}}));
        assert_eq!(
            learnable_overrides(&explicit, &loaded)["unit.config"]["from"],
            "explicit"
        );
        assert_eq!(
            learnable_overrides(&FileOverrides::new(), &loaded)["unit.config"]["from"],
            "file"
        );
    }
}
