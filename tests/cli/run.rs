//! Tests for `kvenv run`.

#![cfg(unix)]

use crate::support::*;

fn seeded() -> Test {
    let t = Test::configured();
    let list = serde_json::json!([secret_json("myapp-key", None, Some("myapp"), Some("API_KEY"))]);
    t.respond("list", None, &list.to_string());
    t.respond(
        "show",
        Some("myapp-key"),
        &secret_json("myapp-key", Some(TRICKY_VALUE), Some("myapp"), Some("API_KEY")).to_string(),
    );
    t
}

#[test]
fn test_run_injects_secrets_unescaped() {
    let t = seeded();

    let output = t.kvenv(&["run", "-r", "myapp", "--", "sh", "-c", "printf '%s' \"$API_KEY\""]);
    assert_success(&output);
    assert_eq!(stdout(&output), TRICKY_VALUE);
}

#[test]
fn test_run_propagates_exit_code() {
    let t = seeded();

    let output = t.kvenv(&["run", "-r", "myapp", "--", "sh", "-c", "exit 7"]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_run_requires_command() {
    let t = seeded();

    let output = t.kvenv(&["run", "-r", "myapp"]);
    assert!(!output.status.success());
}

#[test]
fn test_run_fails_before_spawning_on_missing_secret() {
    let t = Test::configured();

    let output = t.kvenv(&["run", "-r", "myapp", "--", "sh", "-c", "echo ran"]);
    assert_failure(&output);
    assert!(!stdout(&output).contains("ran"));
}
