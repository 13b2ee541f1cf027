//! Integration tests for the `schedule` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive every subcommand
//! through the actual binary, covering stdin/stdout piping, file I/O, format
//! detection, timezone handling and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn schedule_json() -> String {
    std::fs::read_to_string(fixture("schedule.json")).expect("schedule.json fixture must exist")
}

fn schedule() -> Command {
    let mut cmd = Command::cargo_bin("schedule").unwrap();
    cmd.env_remove("SCHEDULE_TZ");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_stdin_lists_overlapping_ids() {
    let output = schedule()
        .arg("conflicts")
        .write_stdin(schedule_json())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!(["1", "2"]));
}

#[test]
fn conflicts_pairs_reports_overlap_minutes() {
    let output = schedule()
        .args(["conflicts", "--pairs", "-i", &fixture("schedule.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let pairs = stdout_json(&output);
    assert_eq!(pairs.as_array().unwrap().len(), 1);
    assert_eq!(pairs[0]["event_a"], "1");
    assert_eq!(pairs[0]["event_b"], "2");
    assert_eq!(pairs[0]["overlap_minutes"], 30);
}

#[test]
fn conflicts_reads_ics_by_extension() {
    let output = schedule()
        .args(["conflicts", "-i", &fixture("calendar.ics")])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!(["office-hours", "seminar"])
    );
}

#[test]
fn conflicts_check_exits_with_status_two() {
    schedule()
        .args(["conflicts", "--check", "-i", &fixture("schedule.json")])
        .assert()
        .code(2);
}

#[test]
fn conflicts_check_passes_for_clean_schedule() {
    let input = r#"[
        {"id":"a","title":"A","start":"2026-03-02T09:00:00Z","end":"2026-03-02T10:00:00Z"},
        {"id":"b","title":"B","start":"2026-03-02T10:00:00Z","end":"2026-03-02T11:00:00Z"}
    ]"#;

    schedule()
        .args(["conflicts", "--check"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn inverted_interval_rejected_by_default() {
    let input = r#"[
        {"id":"x","title":"Backwards","start":"2026-03-02T11:00:00Z","end":"2026-03-02T10:00:00Z"}
    ]"#;

    schedule()
        .arg("conflicts")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ends before it starts"));
}

#[test]
fn inverted_interval_accepted_with_literal_policy() {
    let input = r#"[
        {"id":"x","title":"Backwards","start":"2026-03-02T11:00:00Z","end":"2026-03-02T10:00:00Z"}
    ]"#;

    schedule()
        .args(["--policy", "literal", "conflicts"])
        .write_stdin(input)
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalize subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn normalize_applies_timezone_to_offsetless_times() {
    let output = schedule()
        .args([
            "--tz",
            "Asia/Ho_Chi_Minh",
            "normalize",
            "-i",
            &fixture("response.json"),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let events = stdout_json(&output);
    assert_eq!(events[0]["id"], "1");
    assert_eq!(events[0]["start"], "2026-03-02T01:00:00Z");
    assert_eq!(events[0]["end"], "2026-03-02T02:30:00Z");
    assert_eq!(events[0]["ocrConfidence"], 0.91);
}

#[test]
fn normalize_reads_timezone_from_env() {
    let output = schedule()
        .env("SCHEDULE_TZ", "Asia/Ho_Chi_Minh")
        .arg("normalize")
        .write_stdin(std::fs::read_to_string(fixture("response.json")).unwrap())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)[0]["start"], "2026-03-02T01:00:00Z");
}

#[test]
fn normalize_empty_response_yields_empty_array() {
    let output = schedule()
        .arg("normalize")
        .write_stdin("[]")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn normalize_missing_bounding_box_fails() {
    let input = r#"[{"id":"1","title":"T","start":"2026-03-02T09:00:00Z","end":"2026-03-02T10:00:00Z","ocrConfidence":0.9}]"#;

    schedule()
        .arg("normalize")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("boundingBox"));
}

#[test]
fn invalid_timezone_fails() {
    schedule()
        .args(["--tz", "Mars/Olympus_Mons", "normalize"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Import / export subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn import_ics_file_to_json() {
    let output = schedule()
        .args(["import", "-i", &fixture("calendar.ics")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let events = stdout_json(&output);
    assert_eq!(events.as_array().unwrap().len(), 2);
    assert_eq!(events[0]["id"], "seminar");
    assert_eq!(events[0]["location"], "Room 12");
    assert_eq!(events[1]["title"], "Office Hours");
}

#[test]
fn import_ics_from_stdin_needs_format_flag() {
    let ics = std::fs::read_to_string(fixture("calendar.ics")).unwrap();

    schedule()
        .arg("import")
        .write_stdin(ics.clone())
        .assert()
        .failure();

    schedule()
        .args(["import", "--from", "ics"])
        .write_stdin(ics)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"seminar\""));
}

#[test]
fn export_ics_to_stdout() {
    schedule()
        .args(["export", "--to", "ics", "-i", &fixture("schedule.json")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("BEGIN:VCALENDAR\r\n"))
        .stdout(predicate::str::contains("UID:1@schedulefromimage.com"))
        .stdout(predicate::str::contains("SUMMARY:Chemistry Lab"));
}

#[test]
fn export_txt_uses_timezone() {
    schedule()
        .args([
            "--tz",
            "Asia/Ho_Chi_Minh",
            "export",
            "--to",
            "txt",
            "-i",
            &fixture("schedule.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Schedule Events\r\n"))
        .stdout(predicate::str::contains("Event: Algorithms Lecture"))
        .stdout(predicate::str::contains("  - Time: 3/2/2026 16:00 - 17:30"))
        .stdout(predicate::str::contains("  - Note: Wear goggles"));
}

#[test]
fn export_ics_file_then_import_roundtrip() {
    let ics_path = "/tmp/schedule_cli_test_roundtrip.ics";
    let json_path = "/tmp/schedule_cli_test_roundtrip.json";

    schedule()
        .args([
            "export",
            "--to",
            "ics",
            "-i",
            &fixture("schedule.json"),
            "-o",
            ics_path,
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    schedule()
        .args(["import", "-i", ics_path, "-o", json_path])
        .assert()
        .success();

    let imported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    let original: serde_json::Value = serde_json::from_str(&schedule_json()).unwrap();

    let ids = |v: &serde_json::Value| -> Vec<String> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(ids(&imported), ids(&original));
    assert_eq!(imported[1]["start"], "2026-03-02T10:00:00Z");
    assert_eq!(imported[0]["instructor"], "Dr. Evelyn Reed");

    let _ = std::fs::remove_file(ics_path);
    let _ = std::fs::remove_file(json_path);
}

#[test]
fn export_rejects_txt_as_input_format() {
    schedule()
        .args(["import", "--from", "txt"])
        .write_stdin("Schedule Events")
        .assert()
        .failure()
        .stderr(predicate::str::contains("export-only"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Search / demo subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn search_matches_note_case_insensitively() {
    let output = schedule()
        .args(["search", "GOGGLES", "-i", &fixture("schedule.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let hits = stdout_json(&output);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["id"], "2");
}

#[test]
fn search_without_match_prints_empty_array() {
    let output = schedule()
        .args(["search", "astronomy", "-i", &fixture("schedule.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn demo_prints_six_events() {
    let output = schedule()
        .args(["demo", "--date", "2026-03-02"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let events = stdout_json(&output);
    assert_eq!(events.as_array().unwrap().len(), 6);
    assert_eq!(events[0]["title"], "Project Kick-off");
    assert_eq!(events[0]["start"], "2026-03-02T09:00:00Z");
}

#[test]
fn demo_in_vietnamese() {
    schedule()
        .args(["demo", "--lang", "vi", "--date", "2026-03-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Khởi động dự án"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling / help
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    schedule()
        .args(["conflicts", "-i", "/nonexistent/schedule.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn non_array_input_fails() {
    schedule()
        .arg("conflicts")
        .write_stdin(r#"{"id":"1"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected a JSON array"));
}

#[test]
fn help_flag_shows_usage() {
    schedule()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("conflicts"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn unknown_subcommand_fails() {
    schedule().arg("frobnicate").assert().failure();
}
