//! Corruption recovery tests for the luna binary.
//!
//! These tests verify the system can handle:
//! - Corrupted value files
//! - Individually malformed log entries
//! - Legacy layouts of stored values
//! - Leftover non-JSON files in the data directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn luna(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("luna"));
    cmd.arg("--data-dir").arg(data_dir).arg("--today").arg("2024-06-15");
    cmd
}

#[test]
fn test_corrupted_logs_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("lunaloop_logs.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted logs");

    luna(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 29 of 28"));

    // The next save replaces the unreadable collection
    luna(data_dir)
        .args(["log", "--flow", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2024-06-15"));

    let content = fs::read_to_string(data_dir.join("lunaloop_logs.json")).unwrap();
    let logs: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn test_malformed_entries_are_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("lunaloop_logs.json"),
        r#"[
            {"date":"2024-06-01","flow":"Medium","symptoms":["Cramps"]},
            {"date":"not-a-date"},
            {"flow":"Light"},
            {"date":"2024-06-02","flow":"Torrential"},
            {"date":"2024-06-02","flow":"Light"}
        ]"#,
    )
    .unwrap();

    let output = luna(data_dir)
        .args(["export", "--stdout"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "2024-06-01,Medium,,,0,Cramps");
    assert_eq!(lines[2], "2024-06-02,Light,,,0,");
}

#[test]
fn test_corrupted_user_stats() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("lunaloop_user.json"), "not json").unwrap();

    luna(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("User: level 1, 100 points"));
}

#[test]
fn test_empty_settings_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("lunaloop_settings.json"), "").unwrap();

    luna(data_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle length: 28 days"))
        .stdout(predicate::str::contains("Theme: Pretty in Pink"));
}

#[test]
fn test_partial_settings_use_field_defaults() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("lunaloop_settings.json"), r#"{"cycleLength":32}"#).unwrap();

    luna(data_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle length: 32 days"))
        .stdout(predicate::str::contains("Period length: 5 days"));
}

#[test]
fn test_legacy_reminder_layout_resolves_to_defaults() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("lunaloop_reminders.json"),
        r#"{"daily":true,"time":"21:00"}"#,
    )
    .unwrap();

    luna(data_dir)
        .arg("reminders")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily check-in: off at 20:00"))
        .stdout(predicate::str::contains("Period prediction: on (1 days before, at 09:00)"));
}

#[test]
fn test_reset_leaves_foreign_files() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("notes.txt"), "keep me").unwrap();
    fs::write(data_dir.join("package.json"), r#"{"name":"app"}"#).unwrap();

    luna(data_dir).args(["log", "--mood", "Calm"]).assert().success();
    luna(data_dir).arg("reset").assert().success();
    luna(data_dir).arg("seed").assert().success();

    assert!(data_dir.join("notes.txt").exists());
    assert_eq!(
        fs::read_to_string(data_dir.join("package.json")).unwrap(),
        r#"{"name":"app"}"#
    );
    assert!(data_dir.join("lunaloop_logs.json").exists());
}
