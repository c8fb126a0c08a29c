//! Scenario: register units, deploy, recover from a failure, redeploy.
//!
//! Steps:
//! 1. Register two units in one group
//! 2. Deploy is refused while required settings are missing
//! 3. First unit fails; the sequence aborts and the second is skipped
//! 4. Retry the failed unit and redeploy; both succeed
//! 5. History, logs and the learned template reflect the runs

use crate::common::*;

const DEPLOY_SCRIPT: &str = r#"#!/bin/sh
unit="$2"
echo "[$unit] Updating config"
echo "[$unit] DataVan HMI $MPC_DataVanHMIIp"
if [ -f "fail-$unit" ]; then
  echo "[$unit] upload failed" >&2
  exit 3
fi
echo "[$unit] Deployment complete"
"#;

#[test]
fn scenario_deploy_failure_retry_and_recovery() {
    let env = TestEnv::with_sh_deploy(DEPLOY_SCRIPT);

    let added = env.ok(&["units", "add", "621001", "621002", "--group", "Pumps"]);
    assert!(added.stdout.contains("Added 621001, 621002"), "{}", added.stdout);

    // Step 2: pre-flight rejects before any unit moves
    let refused = env.run(&["deploy", "-y"]);
    assert!(!refused.success);
    assert!(
        refused.stderr.contains("missing required settings"),
        "{}",
        refused.combined_output()
    );
    assert!(env
        .statuses()
        .iter()
        .all(|(_, status)| status == "PENDING"));

    // Step 3: failure aborts the sequence
    env.write_required_settings();
    env.write("fail-621001", "");
    let failed = env.run(&["deploy", "-y", "--json"]);
    assert_eq!(failed.exit_code, 1, "{}", failed.combined_output());

    let events = failed.json_lines();
    assert_eq!(events[0]["event"], "run_start");
    assert_eq!(events[0]["units"], serde_json::json!(["621001", "621002"]));
    let last = events.last().unwrap();
    assert_eq!(last["event"], "complete");
    assert_eq!(last["status"], "partial");
    assert_eq!(last["failed"], 1);
    assert_eq!(last["skipped"], 1);
    assert!(events.iter().any(|e| e["event"] == "log"
        && e["unit"] == "621001"
        && e["level"] == "ERROR"
        && e["message"].as_str().unwrap_or("").contains("upload failed")));

    assert_eq!(
        env.statuses(),
        vec![
            ("621001".to_string(), "FAILED".to_string()),
            ("621002".to_string(), "SKIPPED".to_string()),
        ]
    );

    // Step 4: retry and redeploy
    let retried = env.ok(&["retry", "621001"]);
    assert!(retried.stdout.contains("reset to PENDING"));
    let again = env.run(&["retry", "621001"]);
    assert!(again.stdout.contains("nothing to retry"));

    std::fs::remove_file(env.path("fail-621001")).unwrap();
    env.stage(
        "621001",
        "gateway/unit.config",
        "{\n  \"ip\": \"10.9.9.9\",\n  \"port\": 80\n}\n",
    );
    let deployed = env.ok(&["deploy", "-y"]);
    assert!(
        deployed.stdout.contains("Done: 2 succeeded, 0 failed, 0 skipped"),
        "{}",
        deployed.stdout
    );
    assert!(deployed.stdout.contains("Learned template(s) for: Pumps"));

    // Step 5: history, logs, templates
    let history = env.ok(&["history", "--json"]).json();
    assert_eq!(history["history"]["621001"]["lastStatus"], "SUCCESS");
    assert_eq!(history["history"]["621002"]["lastStatus"], "SUCCESS");

    let logs = env.ok(&["logs", "show"]).stdout;
    assert!(logs.contains("[621001] DataVan HMI 10.1.0.1"), "{logs}");
    assert!(!logs.contains("secret-token"));

    let templates = env.ok(&["templates", "--json"]).json();
    assert_eq!(templates["templates"]["Pumps"]["sourceUnitId"], "621001");
    assert_eq!(
        templates["templates"]["Pumps"]["configOverrides"]["gateway/unit.config"]["ip"],
        "10.9.9.9"
    );
}

#[test]
fn scenario_batch_mode_runs_one_invocation() {
    let env = TestEnv::with_sh_deploy(
        "#!/bin/sh\necho \"units: $2\" > batch-args.txt\necho \"[BATCH] all done\"\n",
    );
    env.write_required_settings();
    env.ok(&["units", "add", "621001,621002"]);

    let result = env.ok(&["deploy", "-y", "--mode", "batch"]);
    assert!(result.stdout.contains("Done: 2 succeeded"), "{}", result.stdout);
    assert_eq!(env.read("batch-args.txt"), "units: 621001,621002\n");
}

#[test]
fn scenario_ip_override_reaches_the_script() {
    let env = TestEnv::with_sh_deploy(DEPLOY_SCRIPT);
    env.write_required_settings();
    env.ok(&["units", "add", "621001"]);
    env.ok(&["ip", "set", "621001", "data-van-hmi", "10.5.5.5"]);

    assert!(env
        .read(".env.local")
        .contains("UNIT_621001_MPC_DataVanHMIIp=10.5.5.5"));

    env.ok(&["deploy", "-y"]);
    let logs = env.ok(&["logs", "show"]).stdout;
    assert!(logs.contains("[621001] DataVan HMI 10.5.5.5"), "{logs}");
}

#[test]
fn scenario_run_action_leaves_statuses_alone() {
    let env = TestEnv::with_sh_deploy(DEPLOY_SCRIPT);
    env.write_required_settings();
    env.ok(&["units", "add", "621001"]);

    let catalog = env.ok(&["run-action"]).stdout;
    assert!(catalog.contains("download"), "{catalog}");
    assert!(catalog.contains("scripts/deploy.sh"));

    let result = env.ok(&["run-action", "deploy", "--units", "621001", "--json"]);
    let events = result.json_lines();
    assert_eq!(events[0]["event"], "action_start");
    assert_eq!(events[0]["units"], serde_json::json!(["621001"]));
    let last = events.last().unwrap();
    assert_eq!(last["event"], "action_complete");
    assert_eq!(last["success"], true);

    assert_eq!(
        env.statuses(),
        vec![("621001".to_string(), "PENDING".to_string())]
    );

    let unknown = env.run(&["run-action", "nope"]);
    assert!(!unknown.success);
    assert!(unknown.stderr.contains("unknown script action"));
}
