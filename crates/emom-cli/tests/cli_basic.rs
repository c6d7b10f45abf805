//! Basic CLI E2E tests.
//!
//! Each test runs the `emom` binary against its own data directory so
//! settings and history never leak between tests or into the real one.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

/// Run a CLI command with `stdin` as input and return (stdout, stderr, code).
fn run_cli_with_input(dir: &TempDir, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_emom"))
        .args(args)
        .env("EMOM_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
    }
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(dir, args, "")
}

/// Invoke a CLI command and expect success.
fn run_cli_success(dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    stdout
}

fn quiet_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(&dir, &["config", "set", "keep_awake", "false"]);
    run_cli_success(&dir, &["config", "set", "cues.bell", "false"]);
    dir
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(&dir, &["config", "get", "default_rounds"]);
    assert_eq!(out.trim(), "20");
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(&dir, &["config", "set", "user_name", "Kai"]);
    let out = run_cli_success(&dir, &["config", "get", "user_name"]);
    assert_eq!(out.trim(), "Kai");
}

#[test]
fn test_config_rejects_zero_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "default_rounds", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
    let out = run_cli_success(&dir, &["config", "get", "default_rounds"]);
    assert_eq!(out.trim(), "20");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(&dir, &["config", "get", "volume"]);
    assert_ne!(code, 0);
}

#[test]
fn test_history_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(&dir, &["history", "list"]);
    assert!(out.contains("No workouts logged yet."));
}

#[test]
fn test_fact() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(&dir, &["fact"]);
    assert!(!out.trim().is_empty());
}

#[test]
fn test_run_to_completion_logs_session() {
    let dir = quiet_dir();
    let out = run_cli_success(
        &dir,
        &["run", "--variant", "EMOM", "--rounds", "1", "--tick-ms", "1"],
    );
    assert!(out.contains("Great work Athlete!"), "stdout: {out}");

    let json = run_cli_success(&dir, &["history", "list", "--json"]);
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "completed");
    assert_eq!(records[0]["actualMinutes"], 1);
    assert_eq!(records[0]["targetMinutes"], 1);
    assert_eq!(records[0]["title"], "EMOM - 1");
}

#[test]
fn test_run_quit_in_second_round_logs_interrupted() {
    let dir = quiet_dir();
    // 25ms ticks: lead-in ends at 125ms, round 2 spans 1625ms..3125ms.
    let mut child = Command::new(env!("CARGO_BIN_EXE_emom"))
        .args(["run", "--variant", "EMOM", "--rounds", "3", "--tick-ms", "25"])
        .env("EMOM_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");
    let mut input = child.stdin.take().unwrap();
    std::thread::sleep(Duration::from_millis(2300));
    input.write_all(b"q\n").unwrap();
    drop(input);
    let output = child.wait_with_output().unwrap();
    let out = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out.contains("Workout stopped."), "stdout: {out}");

    let json = run_cli_success(&dir, &["history", "list", "--json"]);
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "interrupted");
    assert_eq!(records[0]["actualMinutes"], 1);
    assert_eq!(records[0]["targetMinutes"], 3);
}

#[test]
fn test_run_quit_during_lead_in_writes_nothing() {
    let dir = quiet_dir();
    let (out, stderr, code) = run_cli_with_input(
        &dir,
        &["run", "--rounds", "2", "--tick-ms", "200"],
        "q\n",
    );
    assert_eq!(code, 0, "{stderr}");
    assert!(out.contains("Workout stopped."), "stdout: {out}");
    let out = run_cli_success(&dir, &["history", "list"]);
    assert!(out.contains("No workouts logged yet."));
}

#[test]
fn test_run_rejects_unknown_variant() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(&dir, &["run", "--variant", "E4MOM"]);
    assert_ne!(code, 0);
}

#[test]
fn test_history_clear() {
    let dir = quiet_dir();
    run_cli_success(&dir, &["run", "--rounds", "1", "--tick-ms", "1"]);
    run_cli_success(&dir, &["history", "clear"]);
    let out = run_cli_success(&dir, &["history", "list"]);
    assert!(out.contains("No workouts logged yet."));
    let summary: serde_json::Value =
        serde_json::from_str(&run_cli_success(&dir, &["history", "summary"])).unwrap();
    assert_eq!(summary["total_sessions"], 0);
}
