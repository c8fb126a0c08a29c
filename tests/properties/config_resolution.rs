//! Property tests for IP resolution and JSON config merging.

use proptest::prelude::*;
use serde_json::{Map, Value};

use fleet_deploy::domain::services::{apply_ip_override, effective_ip, merge_json, DefaultIps};
use fleet_deploy::domain::value_objects::{IpOverrides, IpRole};

fn ip() -> impl Strategy<Value = String> {
    proptest::string::string_regex("( )?(10\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3})?( )?").unwrap()
}

fn role() -> impl Strategy<Value = IpRole> {
    proptest::sample::select(IpRole::ALL.to_vec())
}

fn json_object() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::btree_map(
        "[a-z]{1,6}",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z0-9.]{0,8}".prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
        ],
        0..6,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A non-blank override wins; otherwise the default applies; both are trimmed.
    #[test]
    fn property_override_then_default(role in role(), over in ip(), default in ip()) {
        let mut overrides = IpOverrides::new();
        overrides.insert(role, over.clone());
        let defaults = DefaultIps::new().with(role, default.clone());

        let expected = if over.trim().is_empty() {
            default.trim().to_string()
        } else {
            over.trim().to_string()
        };
        prop_assert_eq!(effective_ip(&overrides, &defaults, role), expected);
    }

    /// PROPERTY: Setting an override equal to the default never stores it.
    #[test]
    fn property_default_valued_override_is_not_stored(role in role(), default in ip()) {
        let mut overrides = IpOverrides::new();
        overrides.insert(role, "10.255.255.254".to_string());
        apply_ip_override(&mut overrides, role, &default, &default);
        prop_assert!(!overrides.contains_key(&role));
    }

    /// PROPERTY: Merging is idempotent and keeps keys the overrides do not name.
    #[test]
    fn property_merge_is_idempotent(base in json_object(), overrides in json_object()) {
        let base_text = serde_json::to_string(&Value::Object(base.clone())).unwrap();
        let once = merge_json("a/unit.config", &base_text, &overrides).unwrap();
        let twice = merge_json("a/unit.config", &once, &overrides).unwrap();
        prop_assert_eq!(&once, &twice);

        let merged: Map<String, Value> = serde_json::from_str(&once).unwrap();
        for (key, value) in &base {
            if !overrides.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        for (key, value) in &overrides {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// PROPERTY: Merging into anything that is not a JSON object fails instead of panicking.
    #[test]
    fn property_merge_rejects_non_objects(base in "(?s).{0,64}", overrides in json_object()) {
        let is_object = matches!(serde_json::from_str::<Value>(&base), Ok(Value::Object(_)));
        let result = merge_json("a/unit.config", &base, &overrides);
        prop_assert_eq!(result.is_ok(), is_object);
    }
}
