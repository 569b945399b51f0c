//! Integration tests for the luna binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging, merging and deleting days
//! - Cycle status, calendar and analytics output
//! - Settings, onboarding and reminders validation
//! - CSV export, demo seeding and reset

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI pinned to a data directory and a fixed "today"
fn luna(data_dir: &Path, today: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("luna"));
    cmd.arg("--data-dir").arg(data_dir).arg("--today").arg(today);
    cmd
}

fn stored_logs(data_dir: &Path) -> Vec<serde_json::Value> {
    let content =
        fs::read_to_string(data_dir.join("lunaloop_logs.json")).expect("Failed to read logs");
    serde_json::from_str(&content).expect("Logs are not valid JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("luna"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Private menstrual cycle tracker"));
}

#[test]
fn test_status_on_empty_data_dir() {
    let temp_dir = setup_test_dir();

    luna(temp_dir.path(), "2024-06-15")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 29 of 28"))
        .stdout(predicate::str::contains("Phase: Luteal"))
        .stdout(predicate::str::contains("Expected Today"));
}

#[test]
fn test_log_awards_points_and_persists() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--flow", "medium", "--mood", "Happy", "--water", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2024-06-15"))
        .stdout(predicate::str::contains("+275 points"))
        .stdout(predicate::str::contains("Badge unlocked: First Step"))
        .stdout(predicate::str::contains("Streak: 1 days"));

    let logs = stored_logs(data_dir);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["date"], "2024-06-15");
    assert_eq!(logs[0]["flow"], "Medium");
    assert_eq!(logs[0]["waterIntake"], 8);

    let user: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("lunaloop_user.json")).unwrap())
            .unwrap();
    assert_eq!(user["points"], 375);
}

#[test]
fn test_relogging_same_day_merges_without_points() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--flow", "heavy"])
        .assert()
        .success();

    luna(data_dir, "2024-06-15")
        .args(["log", "--symptom", "Cramps", "--symptom", "Bloating"])
        .assert()
        .success()
        .stdout(predicate::str::contains("points").not());

    let logs = stored_logs(data_dir);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["flow"], "Heavy");
    assert_eq!(logs[0]["symptoms"], serde_json::json!(["Cramps", "Bloating"]));
}

#[test]
fn test_status_after_logging_period() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--date", "2024-06-03", "--flow", "medium"])
        .assert()
        .success();

    luna(data_dir, "2024-06-15")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 13 of 28"))
        .stdout(predicate::str::contains("Phase: Ovulation"))
        .stdout(predicate::str::contains("Expected on: 2024-07-01"));
}

#[test]
fn test_calendar_projection() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--date", "2024-06-03", "--flow", "light"])
        .assert()
        .success();

    let output = luna(data_dir, "2024-06-15")
        .args(["calendar", "--months", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "2024-07-01  period");
    assert_eq!(lines[4], "2024-07-05  period");
    assert_eq!(lines[5], "2024-07-15  ovulation");
}

#[test]
fn test_analytics_with_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for day in ["2024-01-01", "2024-01-30", "2024-02-28"] {
        luna(data_dir, "2024-03-10")
            .args(["log", "--date", day, "--flow", "medium", "--symptom", "Cramps"])
            .assert()
            .success();
    }

    luna(data_dir, "2024-03-10")
        .arg("analytics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Average cycle: 29 days"))
        .stdout(predicate::str::contains("Variability: ±0.0 days"))
        .stdout(predicate::str::contains("Cramps"));
}

#[test]
fn test_analytics_without_history() {
    let temp_dir = setup_test_dir();

    luna(temp_dir.path(), "2024-03-10")
        .arg("analytics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Average cycle: 28 days"))
        .stdout(predicate::str::contains("Log at least two full cycles"));
}

#[test]
fn test_delete_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15").args(["log", "--mood", "Calm"]).assert().success();

    luna(data_dir, "2024-06-15")
        .args(["delete", "2024-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2024-06-15"));

    luna(data_dir, "2024-06-15")
        .args(["delete", "2024-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry for 2024-06-15"));

    assert!(stored_logs(data_dir).is_empty());
}

#[test]
fn test_invalid_inputs_fail() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--date", "2024-13-40"])
        .assert()
        .failure();

    luna(data_dir, "2024-06-15")
        .args(["log", "--flow", "torrential"])
        .assert()
        .failure();

    assert!(!data_dir.join("lunaloop_logs.json").exists());
}

#[test]
fn test_settings_validation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["settings", "--cycle-length", "30", "--period-length", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle length: 30 days"))
        .stdout(predicate::str::contains("Period length: 4 days"));

    luna(data_dir, "2024-06-15")
        .args(["settings", "--cycle-length", "60"])
        .assert()
        .failure();

    // Locked until level 3
    luna(data_dir, "2024-06-15")
        .args(["settings", "--theme", "Forest Fairy"])
        .assert()
        .failure();

    luna(data_dir, "2024-06-15")
        .args(["settings", "--theme", "Privacy", "--privacy", "true", "--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle length: 30 days"))
        .stdout(predicate::str::contains("Theme: Privacy"))
        .stdout(predicate::str::contains("Privacy mode: on"))
        .stdout(predicate::str::contains("Name: Ada"));
}

#[test]
fn test_onboarding() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args([
            "onboard",
            "--cycle-length",
            "30",
            "--period-length",
            "6",
            "--last-period",
            "2024-06-03",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Onboarding complete"))
        .stdout(predicate::str::contains("First Step"));

    luna(data_dir, "2024-06-15")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 13 of 30"));
}

#[test]
fn test_reminders() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .arg("reminders")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily check-in: off at 20:00"));

    luna(data_dir, "2024-06-15")
        .args(["reminders", "--pill", "true", "--pill-time", "07:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pill: on at 07:30"));

    luna(data_dir, "2024-06-15")
        .args(["reminders", "--daily-time", "7pm"])
        .assert()
        .failure();

    luna(data_dir, "2024-06-15")
        .arg("reminders")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pill: on at 07:30"))
        .stdout(predicate::str::contains("Daily check-in: off at 20:00"));
}

#[test]
fn test_export_to_file_and_stdout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .args(["log", "--flow", "light", "--symptom", "Cramps", "--symptom", "Acne"])
        .assert()
        .success();

    let csv_path = data_dir.join("out").join("export.csv");
    luna(data_dir, "2024-06-15")
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("Date,Flow,Spotting,Mood,WaterIntake,Symptoms\n"));
    assert!(csv_content.contains("2024-06-15,Light,,,0,Cramps;Acne"));

    luna(data_dir, "2024-06-15")
        .args(["export", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-15,Light,,,0,Cramps;Acne"));
}

#[test]
fn test_seed_and_stats() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data loaded (15 entries)"));

    luna(data_dir, "2024-06-15")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo User: level 5, 3450 points"))
        .stdout(predicate::str::contains("Streak: 5 days"))
        .stdout(predicate::str::contains("[✓] Zen Master"));

    luna(data_dir, "2024-06-15")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 6 of 30"));
}

#[test]
fn test_reset_clears_everything() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15").arg("seed").assert().success();

    luna(data_dir, "2024-06-15")
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));

    assert!(!data_dir.join("lunaloop_logs.json").exists());
    assert!(!data_dir.join("lunaloop_user.json").exists());

    luna(data_dir, "2024-06-15")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("User: level 1, 100 points"));
}

#[test]
fn test_default_command_is_status() {
    let temp_dir = setup_test_dir();

    luna(temp_dir.path(), "2024-06-15")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:"));
}

#[test]
fn test_verbose_logs_engine_activity() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    luna(data_dir, "2024-06-15")
        .env_remove("RUST_LOG")
        .args(["log", "--mood", "Calm"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated log for 2024-06-15").not());

    luna(data_dir, "2024-06-15")
        .env_remove("RUST_LOG")
        .args(["--verbose", "log", "--mood", "Happy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated log for 2024-06-15"));
}
