//! Scenario: a successful deployment teaches its group a template, which
//! is then previewed and applied to another unit of the same group.

use crate::common::*;

const OK_SCRIPT: &str = "#!/bin/sh\necho \"[$2] Deployment complete\"\n";

fn template_env() -> TestEnv {
    let env = TestEnv::with_sh_deploy(OK_SCRIPT);
    env.write_required_settings();
    env.stage(
        "621001",
        "gateway/unit.config",
        "{\n  \"ip\": \"10.9.9.9\",\n  \"port\": 80\n}\n",
    );
    env.stage(
        "621003",
        "gateway/unit.config",
        "{\n  \"ip\": \"10.0.0.3\",\n  \"port\": 80,\n  \"name\": \"pump-3\"\n}\n",
    );
    env.stage("621003", "gateway/notes.txt", "hello\n");
    env.ok(&["units", "add", "621001", "621003", "--group", "Pumps"]);
    env.ok(&["deploy", "621001", "-y"]);
    env
}

#[test]
fn scenario_template_preview_and_apply() {
    let env = template_env();

    let preview = env
        .ok(&["config", "show", "621003", "--template", "--json"])
        .json();
    let file = &preview["files"][0];
    assert_eq!(file["identity"], "gateway/unit.config");
    assert_eq!(file["changed"], true);
    assert_eq!(file["changed_keys"], serde_json::json!(["ip"]));

    let human = env.ok(&["config", "show", "621003", "--template"]).stdout;
    assert!(human.contains("--- a/gateway/unit.config"), "{human}");

    // Non-interactive without --yes refuses
    let refused = env.run(&["config", "apply-template", "621003"]);
    assert!(!refused.success);
    assert!(refused.stderr.contains("--yes"), "{}", refused.stderr);

    env.ok(&["config", "apply-template", "621003", "-y"]);
    let written: serde_json::Value =
        serde_json::from_str(&env.read("staging/621003/gateway/unit.config")).unwrap();
    assert_eq!(written["ip"], "10.9.9.9");
    assert_eq!(written["name"], "pump-3");

    let after = env
        .ok(&["config", "show", "621003", "--template", "--json"])
        .json();
    assert_eq!(after["files"][0]["changed"], false);
}

#[test]
fn scenario_files_and_explicit_overrides() {
    let env = template_env();

    let files = env.ok(&["config", "files", "621003"]).stdout;
    assert_eq!(files, "gateway/notes.txt\ngateway/unit.config\n");

    let cat = env.ok(&["config", "cat", "621003", "gateway/notes.txt"]).stdout;
    assert_eq!(cat, "hello\n");

    env.write("edited.json", "{\"ip\": \"10.7.7.7\", \"port\": 81}");
    env.ok(&[
        "config",
        "write",
        "621003",
        "gateway/unit.config",
        "--from",
        "edited.json",
    ]);
    assert!(env.read("staging/621003/gateway/unit.config").contains("10.7.7.7"));
    assert!(env
        .read("staging/.unit-config-overrides/621003/gateway/unit.config")
        .contains("10.7.7.7"));
    let local = env.read(".env.local");
    assert!(local.contains("UNIT_621003_CONFIG_OVERRIDES="), "{local}");
    assert!(local.contains("PAT=secret-token"));

    // Explicit overrides outrank the group template
    let preview = env
        .ok(&["config", "show", "621003", "--template", "--json"])
        .json();
    assert_eq!(preview["files"][0]["changed_keys"], serde_json::json!([]));

    let saved = env.ok(&["config", "save-overrides", "621003", "--json"]).json();
    assert_eq!(saved["files"], 1);
}

#[test]
fn scenario_path_escape_is_rejected() {
    let env = template_env();
    let result = env.run(&["config", "cat", "621003", "../621001/gateway/unit.config"]);
    assert!(!result.success);
}
