use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskflow"))
        .args(args)
        .env("TASKFLOW_STORE_PATH", dir.join("tasks.json"))
        .env("TASKFLOW_CONFIG_PATH", dir.join("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run taskflow")
}

fn stored(dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join("tasks.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn add_command_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["add", "Pay bill", "-p", "high", "--due", "2099-01-01"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task added successfully!"));
    assert!(stdout.contains("Pay bill"));

    let stored = stored(dir.path());
    assert_eq!(stored["tasks"][0]["title"], "Pay bill");
    assert_eq!(stored["tasks"][0]["priority"], "high");
    assert_eq!(stored["tasks"][0]["due_date"], "2099-01-01");
    assert_eq!(stored["tasks"][0]["completed"], false);
}

#[test]
fn add_command_prepends_new_tasks() {
    let dir = tempfile::tempdir().unwrap();
    assert!(run(dir.path(), &["add", "first task", "-p", "low"]).status.success());
    assert!(run(dir.path(), &["add", "second task", "-p", "low"]).status.success());

    let stored = stored(dir.path());
    let tasks = stored["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "second task");
    assert_eq!(tasks[1]["title"], "first task");
    assert_ne!(tasks[0]["id"], tasks[1]["id"]);
}

#[test]
fn add_command_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["add", "Write report", "-p", "Medium", "-d", "Q4 numbers", "--json"],
    );

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "Write report");
    assert_eq!(value["description"], "Q4 numbers");
    assert_eq!(value["priority"], "medium");
    assert_eq!(value["overdue"], false);
    assert!(value["id"].as_str().unwrap().starts_with("task-"));
}

#[test]
fn add_command_reports_every_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["add", "ab", "--due", "2000-01-01"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: validation_failed"));
    assert!(stderr.contains("Title must be at least 3 characters"));
    assert!(stderr.contains("Priority is required"));
    assert!(stderr.contains("Due date cannot be in the past"));
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn add_command_rejects_missing_title() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["add", "-p", "low"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Title must be at least 3 characters"));
}

#[test]
fn add_command_warns_when_store_cannot_be_written() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "keep me").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_taskflow"))
        .args(["add", "Pay bill", "-p", "high"])
        .env("TASKFLOW_STORE_PATH", blocker.join("tasks.json"))
        .env("TASKFLOW_CONFIG_PATH", dir.path().join("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run taskflow");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Task added successfully!"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING: changes kept in memory but not saved: io_error"));
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "keep me");
}
