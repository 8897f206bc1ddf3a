use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn sigan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sigan").unwrap();
    cmd.env("HOME", home.path()).env_remove("SIGAN_LOG");
    cmd
}

#[test]
fn test_start_prints_chat_text() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["start", "101티", "1036", "--period", "pm"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "101티\n22:36 스타트\n\n47분 반티\n07분 완티",
        ));

    let stored = fs::read_to_string(home.path().join(".sigan").join("history.json")).unwrap();
    assert!(stored.contains("timeHistory"));
}

#[test]
fn test_start_rejects_bad_minute() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["start", "101", "1075"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid minute 75"));

    // Nothing is recorded on failure
    sigan(&home)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No start records yet."));
}

#[test]
fn test_start_rejects_non_numeric_time() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["start", "101", "10:36"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time '10:36'"));
}

#[test]
fn test_end_prints_count() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["end", "700", "810", "--start-period", "오후", "--end-period", "오후"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "시작: 19:00\n끝: 20:10\n소요: 1시간 10분\n결과: 1.2개 끝",
        ));
}

#[test]
fn test_end_from_history_uses_stored_start() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["start", "7", "700", "--period", "pm"])
        .assert()
        .success();

    let output = sigan(&home)
        .args(["end", "--from-history", "1", "930", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["startTime"], "19:00");
    assert_eq!(json["endTime"], "21:30");
    assert_eq!(json["count"], 2.5);
    assert_eq!(json["countText"], "2.5개");
}

#[test]
fn test_end_from_history_rejects_explicit_start() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["start", "7", "700", "--period", "pm"])
        .assert()
        .success();

    sigan(&home)
        .args(["end", "--from-history", "1", "700", "930"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from-history replaces the start time"));

    sigan(&home)
        .args(["history", "end"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No end records yet."));
}

#[test]
fn test_history_list_show_and_clear() {
    let home = TempDir::new().unwrap();

    for (room, time) in [("A", "900"), ("B", "1015")] {
        sigan(&home)
            .args(["start", room, time, "--period", "am"])
            .assert()
            .success();
    }

    let output = sigan(&home)
        .args(["history", "start", "--format", "json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["roomNumber"], "B");
    assert_eq!(entries[1]["startTime"], "09:00");

    sigan(&home)
        .args(["history", "show", "start", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A\n09:00 스타트"));

    sigan(&home)
        .args(["history", "show", "start", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No history entry #3"));

    sigan(&home)
        .args(["history", "clear", "start", "--yes"])
        .assert()
        .success();

    sigan(&home)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No start records yet."));
}

#[test]
fn test_preview() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["preview", "1036", "--period", "am"])
        .assert()
        .success()
        .stdout(predicate::str::contains("오전 + 1036 → 10:36"));

    sigan(&home)
        .args(["preview", "1099"])
        .assert()
        .success()
        .stdout(predicate::str::contains("→ __:__"));
}

#[test]
fn test_config_default_period_applies() {
    let home = TempDir::new().unwrap();

    sigan(&home)
        .args(["config", "set", "defaults.period", "am"])
        .assert()
        .success();

    sigan(&home)
        .args(["config", "get", "defaults.period"])
        .assert()
        .success()
        .stdout(predicate::str::contains("am"));

    sigan(&home)
        .args(["start", "3", "1036"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:36 스타트"));
}
