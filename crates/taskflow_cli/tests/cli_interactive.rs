use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_interactive(dir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_taskflow"))
        .env("TASKFLOW_STORE_PATH", dir.join("tasks.json"))
        .env("TASKFLOW_CONFIG_PATH", dir.join("config.json"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn taskflow");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().expect("failed to wait for taskflow")
}

#[test]
fn interactive_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_interactive(dir.path(), "help\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("add"));
    assert!(stdout.contains("toggle"));
    assert!(stdout.contains("theme"));
}

#[test]
fn interactive_errors_do_not_end_session() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_interactive(
        dir.path(),
        "frobnicate\nadd \"unterminated\nadd \"Water plants\" -p low\nlist --json\n",
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("ERROR: invalid_input").count(), 2);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Water plants"));
}

#[test]
fn interactive_session_shares_state_between_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_interactive(
        dir.path(),
        "add \"First task\" -p high\nadd \"Second task\" -p low\nmove 0 1\nquit\nadd \"never run\" -p low\n",
    );

    assert!(output.status.success());
    let content = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&content).unwrap();
    let titles: Vec<&str> = stored["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First task", "Second task"]);
}

#[test]
fn interactive_validation_errors_name_fields() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_interactive(dir.path(), "add ab\n");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: validation_failed"));
    assert!(stderr.contains("title: Title must be at least 3 characters"));
    assert!(stderr.contains("priority: Priority is required"));
}
