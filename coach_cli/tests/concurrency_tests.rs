//! Concurrency tests for repcoach.
//!
//! These tests verify that multiple processes can safely append to the
//! workout journal at the same time (file locking).

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repcoach"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Replay file with one squat
fn write_one_squat(dir: &Path) -> PathBuf {
    let path = dir.join("squat.jsonl");
    let lines: Vec<String> = [175.0, 150.0, 110.0, 150.0, 175.0]
        .iter()
        .enumerate()
        .map(|(i, knee)| {
            format!(
                r#"{{"t": {:.1}, "valid": true, "confidence": 0.9, "knee_angle": {:.1}}}"#,
                i as f64 * 0.5,
                knee
            )
        })
        .collect();
    fs::write(&path, lines.join("\n")).expect("Failed to write replay file");
    path
}

#[test]
fn test_concurrent_replays_all_recorded() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let replay = write_one_squat(&data_dir);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let data_dir = data_dir.clone();
            let replay = replay.clone();
            thread::spawn(move || {
                cli(&data_dir).arg("replay").arg(&replay).assert().success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Replay thread panicked");
    }

    let journal = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read journal");
    let lines: Vec<&str> = journal.lines().collect();
    assert_eq!(lines.len(), 8, "Expected 8 workouts, got {}", lines.len());

    for line in lines {
        let value: serde_json::Value =
            serde_json::from_str(line).expect("Journal line is not valid JSON");
        assert_eq!(value["rep_count"], 1);
    }
}

#[test]
fn test_history_while_recording() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let replay = write_one_squat(&data_dir);

    cli(&data_dir).arg("replay").arg(&replay).assert().success();

    let writer = {
        let data_dir = data_dir.clone();
        let replay = replay.clone();
        thread::spawn(move || {
            for _ in 0..4 {
                cli(&data_dir).arg("replay").arg(&replay).assert().success();
            }
        })
    };

    for _ in 0..4 {
        cli(&data_dir).arg("history").assert().success();
    }

    writer.join().expect("Writer thread panicked");

    let journal = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 5);
}
