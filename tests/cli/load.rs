//! Tests for `kvenv load`.

#![cfg(unix)]

use crate::support::*;

/// A vault holding two `myapp` secrets and one `other` secret.
fn seeded() -> Test {
    let t = Test::configured();
    let list = serde_json::json!([
        secret_json("myapp-db", None, Some("myapp"), Some("DB_URL")),
        secret_json("myapp-key", None, Some("myapp"), Some("API_KEY")),
        secret_json("other-token", None, Some("other"), Some("TOKEN")),
    ]);
    t.respond("list", None, &list.to_string());
    t.respond(
        "show",
        Some("myapp-db"),
        &secret_json("myapp-db", Some("postgres://db"), Some("myapp"), Some("DB_URL")).to_string(),
    );
    t.respond(
        "show",
        Some("myapp-key"),
        &secret_json("myapp-key", Some(TRICKY_VALUE), Some("myapp"), Some("API_KEY")).to_string(),
    );
    t.respond(
        "show",
        Some("other-token"),
        &secret_json("other-token", Some("tok"), Some("other"), Some("TOKEN")).to_string(),
    );
    t
}

#[test]
fn test_load_prints_exports_for_resource() {
    let t = seeded();

    let output = t.load("myapp");
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("export DB_URL='postgres://db';\n"), "stdout: {}", out);
    assert!(out.contains("export API_KEY="), "stdout: {}", out);
    assert!(!out.contains("TOKEN"), "other resource leaked: {}", out);
    assert_stderr_contains(&output, "loaded 2 secrets");
}

#[test]
fn test_load_output_evals_to_exact_values() {
    let t = seeded();

    let output = t.load("myapp");
    assert_success(&output);

    let script = format!("{}\nprintf '%s' \"$API_KEY\"", stdout(&output));
    let shell = std::process::Command::new("sh")
        .args(["-c", &script])
        .output()
        .unwrap();
    assert!(shell.status.success(), "sh failed: {}", stderr(&shell));
    assert_eq!(stdout(&shell), TRICKY_VALUE);
}

#[test]
fn test_load_fish_syntax() {
    let t = seeded();

    let output = t.kvenv(&["load", "--shell", "fish", "-r", "other"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "set -gx TOKEN 'tok';\n");
}

#[test]
fn test_load_detects_shell_from_env() {
    let t = seeded();

    let output = t
        .cmd()
        .env("SHELL", "/usr/local/bin/fish")
        .args(["load", "-r", "other"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "set -gx TOKEN 'tok';\n");
}

#[test]
fn test_load_selected_entries_by_short_name() {
    let t = seeded();

    let output = t.kvenv(&["load", "--shell", "bash", "-r", "myapp", "db"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export DB_URL='postgres://db';\n");
}

#[test]
fn test_load_unknown_entry_fails() {
    let t = seeded();

    let output = t.kvenv(&["load", "--shell", "bash", "myapp-missing"]);
    assert_failure(&output);
    assert_stdout_empty(&output);
    assert_stderr_contains(&output, "myapp-missing");
}

#[test]
fn test_load_no_match_fails_with_empty_stdout() {
    let t = seeded();

    let output = t.load("nothing");
    assert_failure(&output);
    assert_stdout_empty(&output);
}

#[test]
fn test_load_untagged_entry_fails_unless_skipped() {
    let t = Test::configured();
    let list = serde_json::json!([
        secret_json("myapp-db", None, Some("myapp"), Some("DB_URL")),
        secret_json("myapp-raw", None, Some("myapp"), None),
    ]);
    t.respond("list", None, &list.to_string());
    t.respond(
        "show",
        Some("myapp-db"),
        &secret_json("myapp-db", Some("x"), Some("myapp"), Some("DB_URL")).to_string(),
    );

    let output = t.load("myapp");
    assert_failure(&output);
    assert_stdout_empty(&output);
    assert_stderr_contains(&output, "myapp-raw");

    let output = t.kvenv(&["load", "--shell", "bash", "-r", "myapp", "--skip-untagged"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export DB_URL='x';\n");
    assert_stderr_contains(&output, "skipped myapp-raw");
}

#[test]
fn test_load_falls_back_to_registry() {
    let t = Test::configured();
    let list = serde_json::json!([secret_json("myapp-db", None, Some("myapp"), None)]);
    t.respond("list", None, &list.to_string());
    t.respond(
        "show",
        Some("myapp-db"),
        &secret_json("myapp-db", Some("x"), Some("myapp"), None).to_string(),
    );
    std::fs::write(t.registry_path(), SAMPLE_REGISTRY).unwrap();

    let output = t.load("myapp");
    assert_success(&output);
    assert_eq!(stdout(&output), "export DB_URL='x';\n");
}

#[test]
fn test_load_vault_flag_overrides_config() {
    let t = seeded();

    let output = t.kvenv(&["--vault", "other-vault", "load", "--shell", "bash", "-r", "other"]);
    assert_success(&output);
    assert!(t.az_calls().contains("--vault-name other-vault"));
}

#[test]
fn test_load_short_name_never_matches_bare_entry() {
    let t = Test::configured();
    let list = serde_json::json!([
        secret_json("db", None, Some("billing"), Some("DB_URL")),
        secret_json("myapp-db", None, Some("myapp"), Some("DB_URL")),
    ]);
    t.respond("list", None, &list.to_string());
    t.respond(
        "show",
        Some("db"),
        &secret_json("db", Some("WRONG"), Some("billing"), Some("DB_URL")).to_string(),
    );
    t.respond(
        "show",
        Some("myapp-db"),
        &secret_json("myapp-db", Some("RIGHT"), Some("myapp"), Some("DB_URL")).to_string(),
    );

    let output = t.kvenv(&["load", "--shell", "bash", "-r", "myapp", "db"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export DB_URL='RIGHT';\n");
}
