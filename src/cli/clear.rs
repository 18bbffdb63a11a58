//! Clear command.
//!
//! The inverse of `load`: prints unset statements for the env vars the
//! selected secrets populate. No secret values are read.

use std::io::Write;

use crate::cli::{load, output, Selection};
use crate::core::registry::Registry;
use crate::core::shell::{self, Dialect};
use crate::core::vault::Vault;
use crate::error::Result;

/// Print unset statements for the selected secrets' env vars.
pub fn execute(
    vault: &dyn Vault,
    registry: &Registry,
    selection: &Selection,
    dialect: Dialect,
    out: &mut dyn Write,
) -> Result<()> {
    let bindings = load::select_bindings(vault, registry, selection)?;

    let mut env_vars = bindings.env_vars();
    env_vars.sort_unstable();
    env_vars.dedup();

    out.write_all(shell::render_unsets(dialect, &env_vars).as_bytes())?;
    out.flush()?;

    output::success(&format!("cleared {}", output::count(env_vars.len(), "variable")));
    Ok(())
}
