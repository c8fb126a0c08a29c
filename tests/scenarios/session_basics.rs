//! Scenario: import, review, selection presets, log export and session
//! clearing. No script host is involved.

use crate::common::*;

const EXTRACTION: &str = r#"{
  "units": [
    {"id": "621010", "group": "Sand 1"},
    {"id": "999"},
    {"id": 621011},
    {"id": "621010", "group": "Ignored"}
  ]
}"#;

#[test]
fn scenario_import_and_review() {
    let env = TestEnv::new();
    env.write("response.json", EXTRACTION);

    let report = env.ok(&["import", "response.json", "--json"]).json();
    assert_eq!(report["detected"], 3);
    assert_eq!(report["added"], serde_json::json!(["621010", "621011"]));
    assert_eq!(report["invalid"], serde_json::json!(["999"]));

    let listed = env.ok(&["units", "list", "--json"]).json();
    assert_eq!(listed["counts"]["pending"], 2);
    assert_eq!(listed["counts"]["running"], 0);
    let units = listed["units"].as_array().unwrap();
    assert!(units.iter().all(|u| u["selected"] == false));
    assert_eq!(units[0]["group"], "Sand 1");
    assert_eq!(units[1]["group"], "Unassigned");
    assert_eq!(units[1]["source"], "EXTRACTED");

    let review = env.ok(&["units", "review", "--json"]).json();
    assert_eq!(review["units"], serde_json::json!(["621011"]));

    let verified = env.ok(&["units", "verify", "621011", "--json"]).json();
    assert_eq!(verified["verified"], true);
    let review = env.ok(&["units", "review", "--json"]).json();
    assert_eq!(review["units"], serde_json::json!([]));
}

#[test]
fn scenario_presets_and_selection() {
    let env = TestEnv::new();
    env.ok(&["units", "add", "621001", "621002", "621003"]);
    env.ok(&["units", "group", "--group", "Pumps", "621001", "621003"]);

    env.ok(&["select", "621003", "621001"]);
    env.ok(&["preset", "save", "night"]);
    env.ok(&["preset", "save-group", "Pumps"]);

    let presets = env.ok(&["preset", "list", "--json"]).json();
    let names: Vec<&str> = presets["presets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["night", "Pumps Group"]);
    assert_eq!(
        presets["presets"][0]["ids"],
        serde_json::json!(["621003", "621001"])
    );

    env.ok(&["select", "621002"]);
    env.ok(&["units", "remove", "621003"]);
    let applied = env.ok(&["preset", "apply", "night", "--json"]).json();
    assert_eq!(applied["units"], serde_json::json!(["621001"]));

    let unknown = env.run(&["select", "621009"]);
    assert!(!unknown.success);
    assert!(unknown.stderr.contains("621009"), "{}", unknown.stderr);
}

#[test]
fn scenario_logs_export_and_session_clear() {
    let env = TestEnv::new();
    env.write("response.json", EXTRACTION);
    env.ok(&["import", "response.json"]);
    env.ok(&["preset", "save", "keep", "621010"]);

    let tail = env.ok(&["logs", "show", "-n", "1"]).stdout;
    assert_eq!(tail.lines().count(), 1);

    env.ok(&["logs", "export", "-o", "out/log.txt"]);
    let exported = env.read("out/log.txt");
    assert!(
        exported.contains("[INFO] [SYSTEM] Extraction detected 3 unit(s); added 2."),
        "{exported}"
    );

    let refused = env.run(&["session", "clear"]);
    assert!(!refused.success);

    env.ok(&["session", "clear", "--yes"]);
    let units = env.ok(&["units", "list", "--json"]).json();
    assert_eq!(units["units"], serde_json::json!([]));
    let presets = env.ok(&["preset", "list", "--json"]).json();
    assert_eq!(presets["presets"][0]["name"], "keep");
}

#[test]
fn scenario_settings_hide_the_secret() {
    let env = TestEnv::new();
    env.write(".env", "LinuxHost=10.0.0.2\n");
    env.write(".env.local", "PAT=secret-token\n");

    let check = env.run(&["settings", "check", "--json"]);
    assert_eq!(check.exit_code, 1);
    let missing = check.json();
    assert!(!missing["missing"]
        .as_array()
        .unwrap()
        .iter()
        .any(|k| k == "PAT"));

    env.ok(&["settings", "set", "LinuxUser", "deploy"]);
    let listed = env.ok(&["settings", "list", "--json"]).stdout;
    assert!(listed.contains("LinuxUser"));
    assert!(!listed.contains("secret-token"));
    assert!(env.read(".env.local").contains("PAT=secret-token"));

    let reserved = env.run(&["settings", "set", "PAT", "other"]);
    assert!(!reserved.success);
    assert!(env.read(".env.local").contains("PAT=secret-token"));
}

#[test]
fn scenario_unknown_config_key_warns() {
    let env = TestEnv::new();
    env.write("fleet.toml", "[deploy]\nscript_pth = \"x.ps1\"\n");
    let result = env.ok(&["units", "list"]);
    assert!(
        result
            .stderr
            .contains("unknown config key 'script_pth' in"),
        "{}",
        result.stderr
    );
    assert!(result.stderr.contains("did you mean 'script_path'?"));
}
