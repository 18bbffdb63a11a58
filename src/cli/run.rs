//! Run command.
//!
//! Executes a command with secrets injected as environment variables. This
//! is the native dialect: the child's environment is set directly instead
//! of printing statements for a shell.

use std::process::Command;
use tracing::debug;

use crate::cli::{load, output, Selection};
use crate::core::registry::Registry;
use crate::core::shell;
use crate::core::vault::Vault;
use crate::error::{Error, Result};

/// Run `command` with the selected secrets in its environment.
///
/// Returns the child's exit code, or 1 if it was killed by a signal.
pub fn execute(
    vault: &dyn Vault,
    registry: &Registry,
    selection: &Selection,
    command: &[String],
) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;

    let bindings = load::select_bindings(vault, registry, selection)?;
    let pairs = load::fetch(vault, &bindings)?;

    let mut cmd = Command::new(program);
    cmd.args(args);
    let view: Vec<(&str, &str)> = pairs.iter().map(|(k, s)| (k.as_str(), s.value())).collect();
    shell::apply_native(&mut cmd, &view);
    drop(view);
    drop(pairs);

    output::dimmed(&format!("running {} with {}", program, output::count(bindings.bound.len(), "secret")));
    debug!(program = %program, "spawning child");

    let status = cmd.status().map_err(|e| Error::Other(format!("failed to run {}: {}", program, e)))?;
    Ok(status.code().unwrap_or(1))
}
