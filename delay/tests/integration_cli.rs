use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn preview_json_sequence() {
    let mut cmd = Command::cargo_bin("delay").unwrap();
    cmd.args([
        "--base-ms",
        "100",
        "--multiplier",
        "2",
        "--maximum-ms",
        "800",
        "--json",
        "preview",
        "--count",
        "6",
    ]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["waits_ms"], serde_json::json!([100, 200, 400, 800, 800, 800]));
}

#[test]
fn preview_yaml_by_default() {
    let mut cmd = Command::cargo_bin("delay").unwrap();
    cmd.args(["--base-ms", "20", "preview", "--count", "2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("waits_ms:"))
        .stdout(predicate::str::contains("base_ms: 20"));
}

#[test]
fn flags_override_config_file() {
    let path = std::env::temp_dir().join(format!("delay-cli-{}.yaml", std::process::id()));
    std::fs::write(&path, "base_ms: 10\nmultiplier: 3\nmaximum_ms: 1000\n").unwrap();
    let mut cmd = Command::cargo_bin("delay").unwrap();
    cmd.arg("--config")
        .arg(&path)
        .args(["--multiplier", "2", "--json", "preview", "--count", "3"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    std::fs::remove_file(&path).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["waits_ms"], serde_json::json!([10, 20, 40]));
}

#[test]
fn invalid_jitter_fails_with_structured_error() {
    let mut cmd = Command::cargo_bin("delay").unwrap();
    cmd.args(["--jitter=-0.5", "preview"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: build delay"))
        .stderr(predicate::str::contains("jitter must be"));
}

#[test]
fn sleep_reports_waits() {
    let mut cmd = Command::cargo_bin("delay").unwrap();
    cmd.args([
        "--base-ms",
        "1",
        "--multiplier",
        "2",
        "--maximum-ms",
        "4",
        "--json",
        "sleep",
        "--count",
        "3",
    ]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["waits_ms"], serde_json::json!([1, 2, 4]));
    assert!(v["slept_ms"].as_u64().unwrap() >= 7);
}
