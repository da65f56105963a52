//! End-to-end tests running the built binaries.

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn check(args: &[&str]) -> (Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_tripsplit-check"))
        .args(args)
        .output()
        .expect("failed to run tripsplit-check");
    (
        output.status.code(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn test_check_clean_snapshot() {
    let path = fixture("lisbon.json");
    let (code, stdout) = check(&[path.to_str().unwrap()]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("No problems found."));
}

#[test]
fn test_check_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "members": [{ "id": "a", "name": "Alice" }],
            "expenses": [{ "id": "e1", "description": "", "amount": 10,
                           "paidBy": "zed", "participants": ["a"] }]
        }"#,
    )
    .unwrap();

    let (code, stdout) = check(&[path.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["error_count"], 2);
}

#[test]
fn test_check_quiet_load_failure() {
    let (code, stdout) = check(&["/nonexistent/trip.json", "-q"]);
    assert_eq!(code, Some(2));
    assert!(stdout.is_empty());
}

#[test]
fn test_report_debts() {
    let path = fixture("lisbon.json");
    let output = Command::new(env!("CARGO_BIN_EXE_tripsplit-report"))
        .args([path.to_str().unwrap(), "debts", "--currency", "USD"])
        .output()
        .expect("failed to run tripsplit-report");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1. Carol pays Alice $40.00"), "{stdout}");
    assert!(stdout.contains("2. Bob pays Alice $10.00"), "{stdout}");
}
