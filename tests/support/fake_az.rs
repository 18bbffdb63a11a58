//! Fake `az` CLI.
//!
//! A POSIX shell script that appends its arguments to `calls.log` and
//! answers from `responses/`:
//!
//! - `<action>-<name>.json` / `<action>.json` is printed on stdout
//! - `<action>-<name>.err` / `<action>.err` is printed on stderr, exit 1
//!
//! `<action>` is the `az keyvault secret` verb (`list`, `show`, `set`, ...)
//! or `vault-<verb>` for `az keyvault <verb>`. Without a canned response,
//! `list` is empty, `show` is SecretNotFound, and writes echo the name.

use super::Test;

const SCRIPT: &str = r#"#!/bin/sh
state="$(dirname "$0")"
echo "$*" >> "$state/calls.log"

if [ "$1" = "--version" ]; then
  echo "azure-cli 2.60.0"
  exit 0
fi

if [ "$2" = "secret" ]; then action="$3"; else action="vault-$2"; fi

name=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--name" ]; then name="$arg"; fi
  prev="$arg"
done

for candidate in "$state/responses/$action-$name" "$state/responses/$action"; do
  if [ -f "$candidate.err" ]; then
    cat "$candidate.err" >&2
    exit 1
  fi
  if [ -f "$candidate.json" ]; then
    cat "$candidate.json"
    exit 0
  fi
done

case "$action" in
  list) echo "[]" ;;
  show)
    echo "ERROR: (SecretNotFound) A secret with (name/id) $name was not found in this key vault." >&2
    exit 1
    ;;
  vault-show) echo '{"properties": {"vaultUri": "https://fake.vault.azure.net/"}}' ;;
  *) printf '{"name": "%s"}\n' "$name" ;;
esac
"#;

/// Write the fake az into `dir`.
#[cfg(unix)]
pub fn install(dir: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir.join("responses")).expect("failed to create fake az dir");
    let path = dir.join("az");
    std::fs::write(&path, SCRIPT).expect("failed to write fake az");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod fake az");
}

impl Test {
    /// Make the fake az print `json` for `action` (optionally for one name).
    pub fn respond(&self, action: &str, name: Option<&str>, json: &str) {
        std::fs::write(self.response_path(action, name, "json"), json)
            .expect("failed to write fake az response");
    }

    /// Make the fake az fail `action` with `stderr`.
    pub fn fail(&self, action: &str, name: Option<&str>, stderr: &str) {
        std::fs::write(self.response_path(action, name, "err"), stderr)
            .expect("failed to write fake az error");
    }

    /// Every fake az invocation so far, one per line.
    pub fn az_calls(&self) -> String {
        std::fs::read_to_string(self.az_dir().join("calls.log")).unwrap_or_default()
    }

    fn response_path(&self, action: &str, name: Option<&str>, ext: &str) -> std::path::PathBuf {
        let file = match name {
            Some(name) => format!("{}-{}.{}", action, name, ext),
            None => format!("{}.{}", action, ext),
        };
        self.az_dir().join("responses").join(file)
    }
}
