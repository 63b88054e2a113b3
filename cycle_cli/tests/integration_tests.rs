//! Integration tests for the cycleguard binary.
//!
//! These tests verify end-to-end behavior including:
//! - Setup and status output
//! - Period day and symptom logging
//! - Calendar rendering
//! - CSV export and reset

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any real config file
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cycleguard").expect("Failed to find cycleguard binary");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn read_store(dir: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(dir.join("data/cycleguard_user_data.json"))
        .expect("Failed to read data file");
    serde_json::from_str(&contents).expect("Data file is not valid JSON")
}

fn run_setup(dir: &Path) {
    cli(dir)
        .args(["setup", "--last-period", "2025-01-20"])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Private, offline cycle tracking"));
}

#[test]
fn test_status_before_setup_hints() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No cycle set up yet"));
}

#[test]
fn test_setup_uses_default_lengths() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["setup", "--last-period", "2025-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next period due: Feb 17, 2025"));

    let stored = read_store(temp_dir.path());
    assert_eq!(stored["cycleData"]["lastPeriodStart"], "2025-01-20");
    assert_eq!(stored["cycleData"]["periodLength"], 5);
    assert_eq!(stored["cycleData"]["cycleLength"], 28);
    assert_eq!(stored["hasCompletedOnboarding"], true);
}

#[test]
fn test_setup_rejects_invalid_lengths() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "setup",
            "--last-period",
            "2025-01-20",
            "--period-length",
            "7",
            "--cycle-length",
            "5",
        ])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("data/cycleguard_user_data.json").exists());
}

#[test]
fn test_status_after_setup() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .args(["--today", "2025-02-03", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Today is Feb 3"))
        .stdout(predicate::str::contains("Next Period Due: Feb 17"));
}

#[test]
fn test_log_and_unlog_period_days() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["log", "2025-03-01"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["log", "2025-03-01"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["log", "2025-03-02"])
        .assert()
        .success();

    let stored = read_store(temp_dir.path());
    assert_eq!(stored["periodDays"].as_array().unwrap().len(), 2);

    cli(temp_dir.path())
        .args(["unlog", "2025-03-01"])
        .assert()
        .success();

    let stored = read_store(temp_dir.path());
    assert_eq!(stored["periodDays"], serde_json::json!([{ "date": "2025-03-02" }]));
}

#[test]
fn test_toggle_period_day() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["toggle", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2025-03-01"));
    cli(temp_dir.path())
        .args(["toggle", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2025-03-01"));

    let stored = read_store(temp_dir.path());
    assert!(stored["periodDays"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_date_rejected() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["log", "2025-02-30"])
        .assert()
        .failure();
}

#[test]
fn test_symptom_upsert() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["symptom", "2025-03-01", "--tag", "cramps", "--notes", "first"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["symptom", "2025-03-01", "--tag", "headache", "--notes", "second"])
        .assert()
        .success();

    let stored = read_store(temp_dir.path());
    let logs = stored["symptomLogs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["notes"], "second");
    assert_eq!(logs[0]["symptoms"], serde_json::json!(["headache"]));
}

#[test]
fn test_calendar_marks_predictions() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());
    cli(temp_dir.path())
        .args(["log", "2025-02-18"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["--today", "2025-02-03", "calendar", "--year", "2025", "--month", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("February 2025"))
        .stdout(predicate::str::contains("17P"))
        .stdout(predicate::str::contains("18*"))
        .stdout(predicate::str::contains("[3F]"))
        .stdout(predicate::str::contains("26F"));
}

#[test]
fn test_calendar_offset_moves_month() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .args(["--today", "2025-01-10", "calendar", "--offset", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("December 2024"));
}

#[test]
fn test_calendar_out_of_range_year_fails_cleanly() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .args(["--today", "2025-01-20", "calendar", "--year", "2000000000", "--month", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calendar failed"))
        .stderr(predicate::str::contains("panicked").not());

    cli(temp_dir.path())
        .args(["--today", "2025-01-20", "calendar", "--offset", "2147483647"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calendar failed"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_failed_write_reports_and_keeps_record() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());
    let record = temp_dir.path().join("data/cycleguard_user_data.json");
    let before = fs::read(&record).expect("Failed to read data file");

    // A directory where the lock file belongs makes every write fail
    fs::remove_file(temp_dir.path().join("data/cycleguard_user_data.json.lock"))
        .expect("Failed to remove lock file");
    fs::create_dir(temp_dir.path().join("data/cycleguard_user_data.json.lock"))
        .expect("Failed to create blocking directory");

    cli(temp_dir.path())
        .args(["log", "2025-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Saving failed"));

    assert_eq!(fs::read(&record).expect("Failed to read data file"), before);
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let out_dir = temp_dir.path().join("exports");

    cli(temp_dir.path())
        .args(["log", "2025-03-01"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["symptom", "2025-03-01", "--tag", "cramps", "--notes", "mild, ok"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["--today", "2025-03-20", "export", "--out"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("cycleguard_export_2025-03-20.csv"));

    let csv = fs::read_to_string(out_dir.join("cycleguard_export_2025-03-20.csv"))
        .expect("Failed to read export");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,is_period_day,symptoms,notes");
    assert_eq!(lines[1], "2025-03-01,Yes,cramps,\"mild, ok\"");
}

#[test]
fn test_export_without_data() {
    let temp_dir = setup_test_dir();
    let out_dir = temp_dir.path().join("exports");
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .args(["export", "--out"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No data to export"));

    assert!(!out_dir.exists());
}

#[test]
fn test_reset_requires_confirmation() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    assert_eq!(read_store(temp_dir.path())["hasCompletedOnboarding"], true);

    cli(temp_dir.path())
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data reset"));

    let stored = read_store(temp_dir.path());
    assert_eq!(stored["hasCompletedOnboarding"], false);
    assert!(stored.get("cycleData").is_none());
    assert!(stored["periodDays"].as_array().unwrap().is_empty());
    assert!(stored["symptomLogs"].as_array().unwrap().is_empty());
}

#[test]
fn test_show_prints_json() {
    let temp_dir = setup_test_dir();
    run_setup(temp_dir.path());

    cli(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lastPeriodStart\": \"2025-01-20\""));
}
