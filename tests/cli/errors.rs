//! Tests for error handling and global flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let mut assert = t.cmd().arg("--help").assert().success();
    for command in ["save", "update", "load", "list", "delete", "clear", "migrate", "setup"] {
        assert = assert.stdout(predicate::str::contains(command));
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kvenv "));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "kvenv");
}

#[test]
fn test_unconfigured_suggests_setup() {
    let t = Test::new();

    t.cmd()
        .arg("list")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("kvenv setup"));
}

#[test]
#[cfg(unix)]
fn test_vault_env_var_configures() {
    let t = Test::new();

    let output = t.cmd().env("KVENV_VAULT", VAULT).arg("list").output().unwrap();
    assert_success(&output);
    assert!(t.az_calls().contains("--vault-name team-vault"));
}

#[test]
#[cfg(unix)]
fn test_subscription_passed_to_az() {
    let t = Test::new();
    assert_success(&t.setup(&["--vault", VAULT, "--subscription", "dev-sub"]));

    let output = t.list();
    assert_success(&output);
    assert!(t.az_calls().contains("--subscription dev-sub"));
}

#[test]
fn test_missing_az_is_reported() {
    let t = Test::configured();

    let output = t
        .cmd()
        .env("KVENV_AZ", t.dir.path().join("no-such-az"))
        .arg("list")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "az CLI not found");
}

#[test]
#[cfg(unix)]
fn test_invalid_resource_rejected_before_az() {
    let t = Test::configured();

    let output = t.kvenv(&["load", "-r", "my_app"]);
    assert_failure(&output);
    assert_stdout_empty(&output);
    assert!(!t.az_calls().contains("secret"));
}

#[test]
#[cfg(unix)]
fn test_malformed_az_output() {
    let t = Test::configured();
    t.respond("list", None, "not json");

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "unexpected az output");
}
