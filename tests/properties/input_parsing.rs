//! Property tests for free-form unit lists and `.env` parsing.

use proptest::prelude::*;

use fleet_deploy::domain::entities::{is_valid_unit_id, parse_unit_list};
use fleet_deploy::infrastructure::fs::{parse_env, render_env};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every token lands in exactly one bucket, once, in input order.
    #[test]
    fn property_unit_list_partitions_tokens(input in "[0-9a-z ,\\n]{0,80}") {
        let (valid, invalid) = parse_unit_list(&input);
        prop_assert!(valid.iter().all(|id| is_valid_unit_id(id)));
        prop_assert!(invalid.iter().all(|id| !is_valid_unit_id(id)));

        let mut seen = std::collections::HashSet::new();
        prop_assert!(valid.iter().chain(invalid.iter()).all(|t| seen.insert(t.clone())));
    }

    /// PROPERTY: Generated unit IDs are always accepted.
    #[test]
    fn property_sixty_two_prefix_is_valid(suffix in "[0-9]{4}") {
        let id = format!("62{suffix}");
        prop_assert!(is_valid_unit_id(&id));
        let input = format!(" {id},{id}\n");
        let (valid, _) = parse_unit_list(&input);
        prop_assert_eq!(valid, vec![id]);
    }

    /// PROPERTY: `.env` parsing never panics and parsed keys are unique and non-empty.
    #[test]
    fn property_env_keys_are_unique(content in "[ -~\\n]{0,200}") {
        if let Ok(entries) = parse_env(&content) {
            let mut seen = std::collections::HashSet::new();
            for (key, _) in &entries {
                prop_assert!(!key.is_empty());
                prop_assert_eq!(key.trim(), key.as_str());
                prop_assert!(seen.insert(key.clone()));
            }
        }
    }

    /// PROPERTY: Any printable value written by `render_env` reads back unchanged.
    #[test]
    fn property_rendered_values_read_back(
        key in "[A-Z][A-Za-z0-9_]{0,12}",
        value in "[ -~]{0,40}",
    ) {
        let entries = vec![(key, value)];
        let parsed = parse_env(&render_env(&entries));
        prop_assert!(parsed.is_ok(), "{:?}", parsed);
        prop_assert_eq!(parsed.unwrap(), entries);
    }
}
