//! Property tests for the unit status state machine.

use proptest::prelude::*;

use fleet_deploy::domain::value_objects::UnitStatus;

fn any_status() -> impl Strategy<Value = UnitStatus> {
    proptest::sample::select(UnitStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Applying arbitrary requests only ever lands on states reachable by an edge.
    #[test]
    fn property_status_walk_follows_edges(
        requests in proptest::collection::vec(any_status(), 0..40)
    ) {
        let mut current = UnitStatus::Pending;
        for next in requests {
            match current.transition(next) {
                Ok(moved) => {
                    prop_assert_eq!(moved, next);
                    prop_assert!(current.can_transition_to(next));
                    current = moved;
                }
                Err(_) => {
                    prop_assert!(!current.can_transition_to(next));
                }
            }
        }
    }

    /// PROPERTY: A running unit can only finish; it is never re-queued or reset.
    #[test]
    fn property_running_only_finishes(next in any_status()) {
        let allowed = UnitStatus::Running.can_transition_to(next);
        prop_assert_eq!(
            allowed,
            matches!(next, UnitStatus::Success | UnitStatus::Failed)
        );
    }

    /// PROPERTY: Only failed units go back to `Pending`.
    #[test]
    fn property_pending_only_from_failed(from in any_status()) {
        prop_assert_eq!(
            from.can_transition_to(UnitStatus::Pending),
            from == UnitStatus::Failed
        );
    }

    /// PROPERTY: Status names round-trip through `FromStr`, whatever the case.
    #[test]
    fn property_status_parses_case_insensitively(status in any_status(), lower in any::<bool>()) {
        let text = if lower {
            status.as_str().to_ascii_lowercase()
        } else {
            status.as_str().to_string()
        };
        prop_assert_eq!(text.parse::<UnitStatus>().unwrap(), status);
    }
}
