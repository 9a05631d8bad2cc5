//! Integration tests for the wob binary.
//!
//! These tests verify end-to-end behavior including:
//! - Building workouts interval by interval
//! - Duration estimates as exercises are added and removed
//! - Cascade delete in the store file
//! - Library seeding, CSV export and corrupt-store recovery

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated to `dir` for both data and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wob"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn read_store(dir: &Path) -> serde_json::Value {
    let contents =
        fs::read_to_string(dir.join("data/workouts.json")).expect("Failed to read store");
    serde_json::from_str(&contents).expect("Store is not valid JSON")
}

/// Create a workout and return its id
fn create_workout(dir: &Path, name: &str) -> String {
    let output = cli(dir)
        .args(["new", "--name", name])
        .output()
        .expect("Failed to run wob new");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("id: "))
        .expect("No id in output")
        .to_string()
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interval workout builder"));
}

#[test]
fn test_new_workout_default_name() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("new")
        .assert()
        .success()
        .stdout(predicate::str::contains("Untitled Workout"));

    let store = read_store(temp_dir.path());
    let workouts = store["workouts"].as_object().unwrap();
    assert_eq!(workouts.len(), 1);
    let record = workouts.values().next().unwrap();
    assert_eq!(record["name"], "Untitled Workout");
    assert_eq!(record["total_duration_seconds"], 0.0);
}

#[test]
fn test_list_empty() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet"));
}

#[test]
fn test_build_workout_and_duration() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Conditioning");

    cli(dir)
        .args(["add-interval", id.as_str(), "--name", "Holds", "--rounds", "3"])
        .args(["--rest-between", "60"])
        .assert()
        .success();

    for name in ["Plank", "Wall Sit"] {
        cli(dir)
            .args(["add-exercise", id.as_str(), "1", "--name", name])
            .args(["--method", "30s", "--rest-after", "0"])
            .assert()
            .success();
    }

    // 3 * (30 + 30) + 2 * 60 = 300s
    cli(dir)
        .args(["show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("5m 00s"))
        .stdout(predicate::str::contains("Plank"))
        .stdout(predicate::str::contains("Wall Sit"));

    let store = read_store(dir);
    assert_eq!(store["intervals"].as_object().unwrap().len(), 1);
    let exercises = store["exercises"].as_object().unwrap();
    assert_eq!(exercises.len(), 2);
    for row in exercises.values() {
        assert_eq!(row["kind"], "timed");
        assert_eq!(row["seconds"], 30);
    }
}

#[test]
fn test_invalid_method_rejected() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Strength");

    cli(dir).args(["add-interval", id.as_str()]).assert().success();

    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--name", "Row", "--method", "12-8"])
        .assert()
        .failure();

    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--name", "Push-up"])
        .args(["--method", "rp:10:5-20"])
        .assert()
        .failure();

    let store = read_store(dir);
    assert!(store["exercises"].as_object().unwrap().is_empty());
}

#[test]
fn test_effort_not_clamped() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Hard");

    cli(dir).args(["add-interval", id.as_str()]).assert().success();
    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--name", "Sled Push"])
        .args(["--method", "20s", "--effort", "15"])
        .assert()
        .success();

    cli(dir)
        .args(["show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("effort 15"));
}

#[test]
fn test_delete_cascades() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Doomed");
    let keep = create_workout(dir, "Keeper");

    for _ in 0..2 {
        cli(dir).args(["add-interval", id.as_str()]).assert().success();
    }
    for interval in ["1", "2"] {
        for n in 0..3 {
            cli(dir)
                .args(["add-exercise", id.as_str(), interval])
                .args(["--name", format!("Move {}", n).as_str(), "--method", "8-12"])
                .assert()
                .success();
        }
    }
    cli(dir).args(["add-interval", keep.as_str()]).assert().success();

    let store = read_store(dir);
    assert_eq!(store["intervals"].as_object().unwrap().len(), 3);
    assert_eq!(store["exercises"].as_object().unwrap().len(), 6);

    cli(dir)
        .args(["delete", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 intervals, 6 exercises"));

    let store = read_store(dir);
    assert_eq!(store["workouts"].as_object().unwrap().len(), 1);
    assert_eq!(store["intervals"].as_object().unwrap().len(), 1);
    assert!(store["exercises"].as_object().unwrap().is_empty());
}

#[test]
fn test_remove_interval_drops_its_exercises() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Split");

    for name in ["Warmup", "Main"] {
        cli(dir)
            .args(["add-interval", id.as_str(), "--name", name])
            .assert()
            .success();
    }
    for (interval, moves) in [("1", ["Jog", "Skip"]), ("2", ["Squat", "Press"])] {
        for name in moves {
            cli(dir)
                .args(["add-exercise", id.as_str(), interval, "--name", name, "--method", "8-12"])
                .assert()
                .success();
        }
    }

    let store = read_store(dir);
    let removed_id = store["intervals"]
        .as_object()
        .unwrap()
        .values()
        .find(|row| row["name"] == "Warmup")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    cli(dir)
        .args(["remove-interval", id.as_str(), "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("and 2 exercises"));

    let store = read_store(dir);
    let intervals = store["intervals"].as_object().unwrap();
    assert_eq!(intervals.len(), 1);
    assert!(intervals.values().all(|row| row["name"] == "Main"));

    let exercises = store["exercises"].as_object().unwrap();
    let mut names: Vec<&str> = exercises
        .values()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Press", "Squat"]);
    assert!(exercises
        .values()
        .all(|row| row["interval_id"].as_str() != Some(removed_id.as_str())));

    cli(dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_most_negative_rounds_accepted() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Odd");

    cli(dir)
        .args(["add-interval", id.as_str(), "--rounds=-2147483648", "--rest-between", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated duration"));

    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--name", "Hold", "--method", "30s"])
        .assert()
        .success();

    cli(dir).args(["show", id.as_str()]).assert().success();
}

#[test]
fn test_remove_exercise_keeps_order_gaps() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Gaps");

    cli(dir).args(["add-interval", id.as_str()]).assert().success();
    for name in ["A", "B", "C"] {
        cli(dir)
            .args(["add-exercise", id.as_str(), "1", "--name", name, "--method", "5"])
            .assert()
            .success();
    }

    let store = read_store(dir);
    let middle = store["exercises"]
        .as_object()
        .unwrap()
        .values()
        .find(|row| row["name"] == "B")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    cli(dir)
        .args(["remove-exercise", id.as_str(), &middle[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed \"B\""));

    let store = read_store(dir);
    let mut indices: Vec<i64> = store["exercises"]
        .as_object()
        .unwrap()
        .values()
        .map(|row| row["order_index"].as_i64().unwrap())
        .collect();
    indices.sort();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_library_seeded_once() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("back_squat"))
        .stdout(predicate::str::contains("Plank"));

    let first = read_store(dir)["library"].as_object().unwrap().len();
    cli(dir).arg("library").assert().success();
    let second = read_store(dir)["library"].as_object().unwrap().len();
    assert_eq!(first, second);
}

#[test]
fn test_add_from_library_bumps_usage() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "From Library");

    cli(dir).args(["add-interval", id.as_str()]).assert().success();
    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--from", "plank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plank"));

    cli(dir)
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("used 1×"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let id = create_workout(dir, "Export Me");
    let out = dir.join("export.csv");

    cli(dir)
        .args(["add-interval", id.as_str(), "--name", "Main"])
        .assert()
        .success();
    cli(dir)
        .args(["add-exercise", id.as_str(), "1", "--name", "Squat"])
        .args(["--method", "5-8", "--tempo", "3-1-X"])
        .assert()
        .success();

    cli(dir)
        .args(["export", id.as_str(), "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 exercises"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("workout,interval"));
    assert!(csv.contains("Export Me,Main"));
    assert!(csv.contains("3-1-X"));
}

#[test]
fn test_unknown_workout_fails() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["show", "ffffffff"])
        .assert()
        .failure();
}

#[test]
fn test_corrupted_store_recovers() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::write(dir.join("data/workouts.json"), "{ invalid json }}}}").unwrap();

    cli(dir).arg("new").assert().success();

    assert!(dir.join("data/workouts.json.corrupt").exists());
    let store = read_store(dir);
    assert_eq!(store["workouts"].as_object().unwrap().len(), 1);
}

#[test]
fn test_check_reports_clean_store() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    create_workout(dir, "Clean");

    cli(dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}
