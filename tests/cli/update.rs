//! Tests for `kvenv update`.

#![cfg(unix)]

use crate::support::*;

fn seeded() -> Test {
    let t = Test::configured();
    t.respond(
        "show",
        Some("myapp-db"),
        &secret_json("myapp-db", Some("old"), Some("myapp"), Some("DB_URL")).to_string(),
    );
    t
}

#[test]
fn test_update_value_keeps_tags() {
    let t = seeded();

    let output = t.kvenv(&["update", "db", "-r", "myapp", "--value", "new"]);
    assert_success(&output);
    assert_stderr_contains(&output, "new version");
    assert!(t
        .az_calls()
        .contains("secret set --vault-name team-vault --name myapp-db --value=new --tags env-var-name=DB_URL resource=myapp"));
}

#[test]
fn test_update_env_var_only_sets_attributes() {
    let t = seeded();

    let output = t.kvenv(&["update", "myapp-db", "--env", "DATABASE_URL"]);
    assert_success(&output);
    assert_stderr_contains(&output, "updated tags");

    let calls = t.az_calls();
    assert!(calls.contains(
        "secret set-attributes --vault-name team-vault --name myapp-db --tags env-var-name=DATABASE_URL resource=myapp"
    ));
    assert!(!calls.contains("secret set --"));
}

#[test]
fn test_update_same_tags_is_noop() {
    let t = seeded();

    let output = t.kvenv(&["update", "myapp-db", "--env", "DB_URL"]);
    assert_success(&output);
    assert_stderr_contains(&output, "already up to date");
    assert!(!t.az_calls().contains("set-attributes"));
}

#[test]
fn test_update_value_from_stdin() {
    let t = seeded();

    let output = t
        .cmd()
        .args(["update", "myapp-db", "--stdin"])
        .write_stdin("piped\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.az_calls().contains("--value=piped --tags"));
}

#[test]
fn test_update_requires_a_change() {
    let t = seeded();

    let output = t.kvenv(&["update", "myapp-db"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "nothing to update");
}

#[test]
fn test_update_missing_secret() {
    let t = Test::configured();

    let output = t.kvenv(&["update", "myapp-gone", "--value", "x"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "secret not found: myapp-gone");
}
