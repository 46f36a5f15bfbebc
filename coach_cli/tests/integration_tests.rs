//! Integration tests for the repcoach binary.
//!
//! These tests verify end-to-end behavior including:
//! - Replaying pose samples through a workout
//! - Journal recording and dry runs
//! - Workout history

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repcoach"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn sample(t: f64, knee: f64) -> String {
    format!(
        r#"{{"t": {:.1}, "valid": true, "confidence": 0.9, "knee_angle": {:.1}, "shoulder_angle": 10.0}}"#,
        t, knee
    )
}

/// Full squats, half a second per frame, starting at `t`
fn squats(reps: usize, t: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for rep in 0..reps {
        for (i, knee) in [175.0, 150.0, 110.0, 150.0, 175.0].iter().enumerate() {
            lines.push(sample(t + (rep * 5 + i) as f64 * 0.5, *knee));
        }
    }
    lines
}

fn write_replay(dir: &Path, name: &str, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n") + "\n").expect("Failed to write replay file");
    path
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("repcoach"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Companion workout coach: rep counting and coaching cues",
        ));
}

#[test]
fn test_replay_counts_reps_to_target() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let replay = write_replay(data_dir, "squats.jsonl", &squats(3, 0.0));

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--target")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("We're doing 3 squats together"))
        .stdout(predicate::str::contains("Rep 1/3"))
        .stdout(predicate::str::contains(
            "Rep 3/3  TARGET REACHED! 3 reps! Amazing!",
        ))
        .stdout(predicate::str::contains("Target reached: 3 reps"))
        .stdout(predicate::str::contains("Workout complete! 3 reps in just 7 seconds!"))
        .stdout(predicate::str::contains("Workout recorded"));

    let journal = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 1);
    assert!(journal.contains("\"rep_count\":3"));
    assert!(journal.contains("\"target_reached\":true"));
}

#[test]
fn test_short_set_spoken_and_shown_agree() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let replay = write_replay(data_dir, "short.jsonl", &squats(2, 0.0));

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--target")
        .arg("3")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rep 2/3  2! Good rep!"))
        .stdout(predicate::str::contains("Coach: \"2!\""))
        .stdout(predicate::str::contains("more!").not());
}

#[test]
fn test_dry_run_does_not_record() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let replay = write_replay(data_dir, "squats.jsonl", &squats(2, 0.0));

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reps: 2/10"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_idle_tease_and_re_engagement() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let mut lines = squats(1, 0.0);
    lines.push(sample(12.0, 175.0));
    lines.extend(squats(1, 13.0));
    let replay = write_replay(data_dir, "idle.jsonl", &lines);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello? Did you fall asleep on me?"))
        .stdout(predicate::str::contains("There you are! Welcome back!"))
        .stdout(predicate::str::contains("Teases: 1"));
}

#[test]
fn test_lost_pose_is_reported() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let lines = vec![
        sample(0.0, 175.0),
        r#"{"t": 0.5, "valid": false, "confidence": 0.05}"#.to_string(),
        r#"{"t": 1.0, "valid": false, "confidence": 0.02}"#.to_string(),
    ];
    let replay = write_replay(data_dir, "lost.jsonl", &lines);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pose detected (confidence 0.05)"))
        .stdout(predicate::str::contains("confidence 0.02").not());
}

#[test]
fn test_exercise_from_free_text() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let lines: Vec<String> = [40.0, 90.0, 155.0, 120.0, 45.0]
        .iter()
        .enumerate()
        .map(|(i, shoulder)| {
            format!(
                r#"{{"t": {:.1}, "valid": true, "confidence": 0.9, "knee_angle": 178.0, "shoulder_angle": {:.1}}}"#,
                i as f64 * 0.5,
                shoulder
            )
        })
        .collect();
    let replay = write_replay(data_dir, "arms.jsonl", &lines);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--exercise")
        .arg("let's raise our arms")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: arm raises"))
        .stdout(predicate::str::contains("Reps: 1/10"));
}

#[test]
fn test_unknown_exercise_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let replay = write_replay(data_dir, "squats.jsonl", &squats(1, 0.0));

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .arg("--exercise")
        .arg("yoga")
        .assert()
        .failure()
        .stderr(predicate::str::contains("yoga"));
}

#[test]
fn test_malformed_replay_line_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let lines = vec![sample(0.0, 175.0), "not json".to_string()];
    let replay = write_replay(data_dir, "bad.jsonl", &lines);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.jsonl:2"));

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_negative_sample_time_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let replay = write_replay(data_dir, "neg.jsonl", &[sample(-1.0, 175.0)]);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_out_of_range_sample_time_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let lines = vec![
        sample(0.0, 175.0),
        r#"{"t": 1e19, "valid": true, "confidence": 0.9, "knee_angle": 150.0}"#.to_string(),
    ];
    let replay = write_replay(data_dir, "far.jsonl", &lines);

    cli(data_dir)
        .arg("replay")
        .arg(&replay)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("far.jsonl:2"))
        .stderr(predicate::str::contains("panicked").not());

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_empty_history() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts recorded yet."));
}

#[test]
fn test_history_lists_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for reps in [1, 2] {
        let replay = write_replay(data_dir, "run.jsonl", &squats(reps, 0.0));
        cli(data_dir).arg("replay").arg(&replay).assert().success();
        // finished_at has sub-second resolution; keep the runs ordered
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    let output = cli(data_dir)
        .arg("history")
        .output()
        .expect("Failed to run history");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("2/10"));
    assert!(lines[1].contains("1/10"));

    cli(data_dir)
        .arg("history")
        .arg("--limit")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/10"))
        .stdout(predicate::str::contains("1/10").not());
}
