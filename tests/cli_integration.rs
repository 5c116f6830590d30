//! CLI integration tests for tt
//!
//! Each test runs the binary against its own task file and config in a
//! temporary directory.

use chrono::{Duration, Local};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the tt binary bound to a temp directory
fn tt_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tt"));
    cmd.current_dir(dir.path())
        .env("TT_DB", dir.path().join(".db.tt"))
        .env("TT_CONFIG", dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn read_db(dir: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(dir.path().join(".db.tt")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn task_texts(dir: &TempDir) -> Vec<String> {
    read_db(dir)["boards"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|b| b["tasks"].as_array().unwrap().clone())
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

fn days_ago(days: i64) -> String {
    (Local::now().naive_local() - Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn add(dir: &TempDir, text: &str) {
    tt_cmd(dir).args(["add", text]).assert().success();
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_list_empty_store() {
    let dir = TempDir::new().unwrap();

    tt_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));

    assert!(dir.path().join(".db.tt").is_file());
}

#[test]
fn test_list_filters_by_pattern() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");
    add(&dir, "walk the dog");

    tt_cmd(&dir)
        .args(["list", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"))
        .stdout(predicate::str::contains("walk the dog").not());
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");

    let output = tt_cmd(&dir).args(["ls", "--format", "json"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["boards"][0]["name"], "actual");
    assert_eq!(json["boards"][0]["tasks"][0]["name"], "buy milk");
    assert_eq!(json["stats"]["open"], 1);
}

// =============================================================================
// Adding
// =============================================================================

#[test]
fn test_add_creates_default_board() {
    let dir = TempDir::new().unwrap();

    tt_cmd(&dir)
        .args(["add", "buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "task \"buy milk\" is now added to your actual board.",
        ));

    let db = read_db(&dir);
    assert_eq!(db["boards"][0]["name"], "actual");
    assert_eq!(db["boards"][0]["tasks"][0]["id"], 1);
    assert_eq!(db["boards"][0]["tasks"][0]["status"], false);
}

#[test]
fn test_add_first_task_to_named_board() {
    let dir = TempDir::new().unwrap();

    tt_cmd(&dir)
        .args(["--no-aging", "add", "review PR", "--board", "work"])
        .assert()
        .success();

    assert_eq!(read_db(&dir)["boards"][0]["name"], "work");
}

#[test]
fn test_add_duplicate_is_skipped() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");

    tt_cmd(&dir)
        .args(["add", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(task_texts(&dir), vec!["buy milk"]);
}

#[test]
fn test_add_to_unknown_board_fails() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");

    tt_cmd(&dir)
        .args(["add", "x", "--board", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("board not found: nowhere"));
}

#[test]
fn test_ids_not_reused_across_runs() {
    let dir = TempDir::new().unwrap();
    add(&dir, "one");
    add(&dir, "two");
    tt_cmd(&dir).args(["rm", "two"]).assert().success();
    add(&dir, "three");

    let db = read_db(&dir);
    let ids: Vec<_> = db["boards"][0]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

// =============================================================================
// Done / remove
// =============================================================================

#[test]
fn test_done_unique_match() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");
    add(&dir, "buy bread");

    tt_cmd(&dir)
        .args(["done", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checked as done"))
        .stdout(predicate::str::contains("[✓] buy milk"))
        .stdout(predicate::str::contains("[ ] buy bread"));

    let db = read_db(&dir);
    assert_eq!(db["boards"][0]["tasks"][0]["status"], true);
    assert_eq!(db["boards"][0]["tasks"][1]["status"], false);
}

#[test]
fn test_done_no_match_fails() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");

    tt_cmd(&dir)
        .args(["done", "zebra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no task matches 'zebra'"));
}

#[test]
fn test_done_skips_finished_tasks() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");
    tt_cmd(&dir).args(["done", "milk"]).assert().success();

    tt_cmd(&dir).args(["check", "milk"]).assert().failure();
}

#[test]
fn test_remove_ambiguous_prompts() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");
    add(&dir, "buy bread");

    tt_cmd(&dir)
        .args(["remove", "buy"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Select a task [1-2]"))
        .stdout(predicate::str::contains("task \"buy bread\" from board actual removed."));

    assert_eq!(task_texts(&dir), vec!["buy milk"]);
}

#[test]
fn test_remove_aborted_selection_keeps_tasks() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");
    add(&dir, "buy bread");

    tt_cmd(&dir)
        .args(["remove", "buy"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("task selection aborted"));

    assert_eq!(task_texts(&dir).len(), 2);
}

// =============================================================================
// Boards
// =============================================================================

#[test]
fn test_board_create_and_validate() {
    let dir = TempDir::new().unwrap();

    tt_cmd(&dir)
        .args(["--no-aging", "board", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("board work created."));

    tt_cmd(&dir)
        .args(["--no-aging", "board", "WORK"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tt_cmd(&dir)
        .args(["--no-aging", "board", "my board"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not contain spaces"));

    tt_cmd(&dir)
        .args(["--no-aging", "add", "review PR", "-b", "Work"])
        .assert()
        .success();

    assert_eq!(read_db(&dir)["boards"][0]["tasks"][0]["name"], "review PR");
}

#[test]
fn test_board_refused_while_aging() {
    let dir = TempDir::new().unwrap();
    add(&dir, "buy milk");

    tt_cmd(&dir)
        .args(["board", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot create board work"))
        .stdout(predicate::str::contains("created").not());

    tt_cmd(&dir)
        .args(["add", "review PR", "-b", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("board not found: work"));

    let db = read_db(&dir);
    assert_eq!(db["boards"].as_array().unwrap().len(), 1);
    assert_eq!(db["boards"][0]["name"], "actual");
}

#[test]
fn test_board_usable_with_aging_disabled_in_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "aging = false\n").unwrap();
    add(&dir, "buy milk");

    tt_cmd(&dir).args(["board", "work"]).assert().success();
    tt_cmd(&dir).assert().success().stdout(predicate::str::contains("@work"));

    tt_cmd(&dir)
        .args(["add", "review PR", "-b", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added to your work board"));
}

// =============================================================================
// Aging
// =============================================================================

#[test]
fn test_old_tasks_move_to_buckets() {
    let dir = TempDir::new().unwrap();
    let db = serde_json::json!({
        "boards": [{
            "id": 1,
            "name": "actual",
            "status": false,
            "tasks": [
                {"id": 1, "name": "fresh", "status": false, "date": days_ago(0)},
                {"id": 2, "name": "ten days", "status": false, "date": days_ago(10)},
                {"id": 3, "name": "forty days", "status": true, "date": days_ago(40)},
            ]
        }]
    });
    fs::write(dir.path().join(".db.tt"), db.to_string()).unwrap();

    tt_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("@actual"))
        .stdout(predicate::str::contains("@month"))
        .stdout(predicate::str::contains("@rotten"));

    let db = read_db(&dir);
    let boards: Vec<_> = db["boards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["name"].as_str().unwrap().to_string(), b["tasks"][0]["id"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        boards,
        vec![
            ("actual".to_string(), 1),
            ("month".to_string(), 2),
            ("rotten".to_string(), 3),
        ]
    );
}

#[test]
fn test_no_aging_keeps_boards() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "aging = false\n").unwrap();
    tt_cmd(&dir).args(["add", "x", "-b", "inbox"]).assert().success();

    tt_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("@inbox"));
}

#[test]
fn test_unreadable_date_skips_aging() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".db.tt"),
        r#"{"boards":[{"id":1,"name":"My board","status":false,"tasks":[{"id":1,"name":"legacy task","status":false}]}]}"#,
    )
    .unwrap();

    tt_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("@My board"))
        .stderr(predicate::str::contains("skipping bucket recalculation"));

    assert_eq!(read_db(&dir)["boards"][0]["name"], "My board");
}

#[test]
fn test_corrupt_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".db.tt"), "{broken").unwrap();

    tt_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode task file"));

    assert_eq!(fs::read_to_string(dir.path().join(".db.tt")).unwrap(), "{broken");
}
