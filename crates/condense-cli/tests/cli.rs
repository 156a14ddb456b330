//! End-to-end tests for the condense binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn history_file(tokens: usize) -> NamedTempFile {
    let history = json!([
        {"role": "user", "content": "abc ".repeat(tokens)}
    ]);
    write_temp(&history.to_string(), ".json")
}

fn condense(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("condense").unwrap();
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config.path());
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_estimate_json() {
    let config = write_temp("", ".toml");
    let history = history_file(1234);

    let output = condense(&config)
        .args(["--json", "estimate"])
        .arg(history.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({"messages": 1, "tokens": 1234}));
}

#[test]
fn test_estimate_document_with_instructions() {
    let config = write_temp("", ".toml");
    let history = write_temp(
        r#"{"messages": [{"role": "human", "content": "12345678"}], "instructions": "1234"}"#,
        ".json",
    );

    let output = condense(&config)
        .args(["--json", "estimate"])
        .arg(history.path())
        .output()
        .unwrap();

    assert_eq!(stdout_json(&output), json!({"messages": 1, "tokens": 3}));
}

#[test]
fn test_estimate_accepts_unlisted_roles() {
    let config = write_temp("", ".toml");
    let history = write_temp(
        r#"[{"role": "developer", "content": "12345678"}, {"role": "user", "content": "1234"}]"#,
        ".json",
    );

    let output = condense(&config)
        .args(["--json", "estimate"])
        .arg(history.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({"messages": 2, "tokens": 3}));
}

#[test]
fn test_estimate_text_output() {
    let config = write_temp("", ".toml");
    let history = history_file(42);

    condense(&config)
        .arg("estimate")
        .arg(history.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated tokens"))
        .stdout(predicate::str::contains("42"));
}

#[test]
fn test_check_triggers_for_large_history() {
    let config = write_temp("", ".toml");
    let history = history_file(300_000);

    let output = condense(&config)
        .args(["--json", "--model", "gpt-5.2", "check"])
        .arg(history.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let body = stdout_json(&output);
    assert_eq!(body["context_window"], 400_000);
    assert_eq!(body["decision"], "triggered");
    assert_eq!(body["should_compact"], true);
}

#[test]
fn test_check_unsupported_model() {
    let config = write_temp("", ".toml");
    let history = history_file(300_000);

    let output = condense(&config)
        .args(["--json", "--model", "claude-x", "check"])
        .arg(history.path())
        .output()
        .unwrap();

    let body = stdout_json(&output);
    assert_eq!(body["supports_compaction"], false);
    assert_eq!(body["decision"], "unsupported_model");
    assert_eq!(body["should_compact"], false);
}

#[test]
fn test_check_respects_config_file() {
    let config = write_temp(
        "default_model = \"gpt-5.2\"\n[compaction]\nenabled = false\n",
        ".toml",
    );
    let history = history_file(300_000);

    let output = condense(&config)
        .args(["--json", "check"])
        .arg(history.path())
        .output()
        .unwrap();

    assert_eq!(stdout_json(&output)["decision"], "disabled");
}

#[test]
fn test_compact_below_threshold_makes_no_request() {
    // unreachable base url: a request would fail, but none should be made
    let config = write_temp(
        "api_key = \"sk-test\"\nbase_url = \"http://127.0.0.1:1\"\n",
        ".toml",
    );
    let history = history_file(50_000);

    let output = condense(&config)
        .args(["--json", "compact"])
        .arg(history.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"outcome": "not_compacted", "original_tokens": 50_000})
    );
}

#[test]
fn test_compact_failure_falls_back() {
    let config = write_temp(
        "api_key = \"sk-test\"\nbase_url = \"http://127.0.0.1:1\"\ntimeout_seconds = 5\n",
        ".toml",
    );
    let history = history_file(300_000);

    let output = condense(&config)
        .args(["--json", "compact"])
        .arg(history.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["outcome"], "not_compacted");
}

#[test]
fn test_compact_requires_api_key() {
    let config = write_temp("", ".toml");
    let history = history_file(10);

    condense(&config)
        .arg("compact")
        .arg(history.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key found"));
}

#[test]
fn test_invalid_threshold_is_rejected() {
    let config = write_temp("[compaction]\nthreshold_percent = 1.5\n", ".toml");
    let history = history_file(10);

    condense(&config)
        .arg("check")
        .arg(history.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid compaction threshold"));
}

#[test]
fn test_missing_history_file() {
    let config = write_temp("", ".toml");

    condense(&config)
        .args(["estimate", "/nonexistent/history.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read history file"));
}
