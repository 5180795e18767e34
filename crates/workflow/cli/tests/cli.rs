//! Binary tests for `wfdoc`.

use assert_cmd::Command;
use predicates::prelude::*;

fn wfdoc() -> Command {
    Command::cargo_bin("wfdoc").unwrap()
}

#[test]
fn test_sample_prints_valid_json() {
    let output = wfdoc().args(["-o", "json", "sample"]).output().unwrap();
    assert!(output.status.success());

    let document = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(value["tasks"][0]["id"], "create_query");
    assert_eq!(value["tasks"][3]["id"], "_end");
}

#[test]
fn test_sample_round_trips_through_validate_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");

    wfdoc()
        .args(["sample", "--out"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 tasks, 3 steps"));

    wfdoc()
        .args(["-o", "json", "validate", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));

    wfdoc()
        .args(["-o", "json", "inspect", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("create_query"))
        .stdout(predicate::str::contains("is_valid Contains 'Yes' else create_query"));
}

#[test]
fn test_validate_reports_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "config": {"max_steps": 50, "max_time": 200},
            "tasks": [{
                "id": "a", "name": "A", "description": "d", "prompt": "p",
                "operator": "execute"
            }],
            "steps": [],
            "return_value": {"input": {"type": "read", "key": "x"}}
        }"#,
    )
    .unwrap();

    wfdoc()
        .args(["validate", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("$.tasks[0].operator"));
}

#[test]
fn test_legacy_check_operator_validates_and_inspects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("check.json");
    std::fs::write(
        &path,
        r#"{
            "config": {"max_steps": 10, "max_time": 60, "tools": []},
            "tasks": [
                {
                    "id": "verify", "name": "Verify", "description": "d",
                    "prompt": "Is {{answer}} correct?", "operator": "check",
                    "inputs": [
                        {
                            "name": "answer",
                            "value": {"type": "read", "key": "answer"},
                            "required": true
                        }
                    ],
                    "outputs": [{"type": "write", "key": "verdict", "value": "__result"}]
                },
                {"id": "_end", "name": "Task", "description": "d", "prompt": "", "operator": "end"}
            ],
            "steps": [{"source": "verify", "target": "_end"}],
            "return_value": {"input": {"type": "read", "key": "verdict"}}
        }"#,
    )
    .unwrap();

    wfdoc()
        .args(["validate", "--file"])
        .arg(&path)
        .assert()
        .success();

    wfdoc()
        .args(["-o", "json", "inspect", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"operator\": \"check\""));
}

#[test]
fn test_validate_reports_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    wfdoc()
        .args(["validate", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed document"));
}

#[test]
fn test_missing_file() {
    wfdoc()
        .args(["inspect", "--file", "/nonexistent/workflow.json"])
        .assert()
        .failure();
}
