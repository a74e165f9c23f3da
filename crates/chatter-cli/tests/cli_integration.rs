//! Integration tests for CLI behavior
//!
//! These run the built binary. No inference server is needed: turns are
//! sent to a port with nothing listening, which exercises the error reply
//! path end to end.

use std::fs;
use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Endpoint on a local port that refuses connections.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("http://{}/api/generate", addr)
}

/// Base command with CHATTER_HOME pointed at a temp dir so no user config leaks in.
fn chatter(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatter"));
    cmd.env("CHATTER_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run chatter");
    child
        .stdin
        .take()
        .expect("no stdin")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for chatter")
}

/// The single session log written under `log_dir`.
fn only_log(log_dir: &Path) -> String {
    let entries: Vec<_> = fs::read_dir(log_dir)
        .expect("log dir missing")
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one session log: {:?}", entries);
    let name = entries[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("chat_") && name.ends_with(".txt"), "{}", name);
    fs::read_to_string(&entries[0]).unwrap()
}

#[test]
fn integration_help_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_chatter"))
        .arg("--help")
        .output()
        .expect("failed to run chatter");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chatter"));
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("--model"));
}

#[test]
fn integration_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_chatter"))
        .arg("--version")
        .output()
        .expect("failed to run chatter");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("chatter"));
}

#[test]
fn integration_one_shot_unreachable_server_reports_error() {
    let home = TempDir::new().unwrap();
    let log_dir = home.path().join("logs");

    let output = chatter(home.path())
        .args(["--endpoint", &dead_endpoint(), "--log-dir"])
        .arg(&log_dir)
        .args(["hello", "there"])
        .output()
        .expect("failed to run chatter");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("You: hello there\n\n"), "{}", stdout);
    assert_eq!(stdout.matches("Ollama: [Error]").count(), 1, "{}", stdout);

    let log = only_log(&log_dir);
    assert!(log.starts_with("You: hello there\n\n"));
    assert_eq!(log.matches("Ollama: [Error]").count(), 1);
    assert_eq!(log, stdout);
}

#[test]
fn integration_interactive_skips_blank_lines_and_quits() {
    let home = TempDir::new().unwrap();
    let log_dir = home.path().join("logs");

    let mut cmd = chatter(home.path());
    cmd.args(["--endpoint", &dead_endpoint(), "--log-dir"])
        .arg(&log_dir);
    let output = run_with_stdin(cmd, "\n   \n/quit\nnever sent\n");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    // the session log is created at startup even if nothing is said
    assert_eq!(only_log(&log_dir), "");
}

#[test]
fn integration_interactive_turns_in_order() {
    let home = TempDir::new().unwrap();
    let log_dir = home.path().join("logs");

    let mut cmd = chatter(home.path());
    cmd.args(["--endpoint", &dead_endpoint(), "--log-dir"])
        .arg(&log_dir);
    let output = run_with_stdin(cmd, "first\nsecond\n");

    assert!(output.status.success());
    let log = only_log(&log_dir);
    let first = log.find("You: first").expect("first turn missing");
    let second = log.find("You: second").expect("second turn missing");
    assert!(first < second);
    assert_eq!(log.matches("Ollama: [Error]").count(), 2);
}

#[test]
fn integration_labels_from_config_file() {
    let home = TempDir::new().unwrap();
    let log_dir = home.path().join("logs");
    fs::write(
        home.path().join("config.toml"),
        "user_label = \"Me\"\nassistant_label = \"Llama\"\n",
    )
    .unwrap();

    let output = chatter(home.path())
        .args(["--endpoint", &dead_endpoint(), "--log-dir"])
        .arg(&log_dir)
        .arg("hi")
        .output()
        .expect("failed to run chatter");

    assert!(output.status.success());
    let log = only_log(&log_dir);
    assert!(log.starts_with("Me: hi\n\nLlama: [Error]"), "{}", log);
}

#[test]
fn integration_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("broken.toml");
    fs::write(&config_path, "wrap_width = \"wide\"\n").unwrap();

    let output = chatter(home.path())
        .arg("--config")
        .arg(&config_path)
        .arg("hi")
        .output()
        .expect("failed to run chatter");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config"), "{}", stderr);
}
