//! Load command.
//!
//! Prints one export statement per secret for the calling shell to `eval`.
//! Statements are the only thing written to stdout.

use std::io::Write;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{output, setup, Selection};
use crate::core::registry::Registry;
use crate::core::resolve::{self, Bindings};
use crate::core::secret::Secret;
use crate::core::shell::{self, Dialect};
use crate::core::validation;
use crate::core::vault::Vault;
use crate::error::Result;

/// Print export statements for the selected secrets.
pub fn execute(
    vault: &dyn Vault,
    registry: &Registry,
    selection: &Selection,
    dialect: Dialect,
    out: &mut dyn Write,
) -> Result<()> {
    let bindings = select_bindings(vault, registry, selection)?;
    let pairs = fetch(vault, &bindings)?;

    let view: Vec<(&str, &str)> = pairs.iter().map(|(k, s)| (k.as_str(), s.value())).collect();
    let script = Zeroizing::new(shell::render_exports(dialect, &view));
    out.write_all(script.as_bytes())?;
    out.flush()?;

    debug!(dialect = dialect.name(), count = pairs.len(), "emitted exports");
    output::success(&format!("loaded {}", output::count(pairs.len(), "secret")));
    if atty::is(atty::Stream::Stdout) {
        output::hint(&format!(
            "to apply, run: {}",
            output::cmd(&setup::integration_line(dialect))
        ));
    }
    Ok(())
}

/// Select entries and pair them with env var names, reporting skipped
/// entries and env vars claimed twice on stderr.
///
/// # Errors
///
/// Returns error if listing fails, nothing matches, or an entry has no env
/// var name and `--skip-untagged` is not set.
pub fn select_bindings(
    vault: &dyn Vault,
    registry: &Registry,
    selection: &Selection,
) -> Result<Bindings> {
    for resource in &selection.resources {
        validation::validate_resource(resource)?;
    }

    let entries = vault.list()?;
    let selected = resolve::select(&entries, &selection.entries, &selection.resources)?;
    let bindings = resolve::bind(selected, registry, selection.skip_untagged)?;

    for name in &bindings.skipped {
        output::warn(&format!("skipped {}: no env var name (tag it with kvenv update --env)", name));
    }
    for (env_var, names) in bindings.duplicates() {
        output::warn(&format!(
            "{} is set by {}; the last one wins",
            output::key(env_var),
            names.join(", ")
        ));
    }
    Ok(bindings)
}

/// Read each bound secret's value, paired with its env var.
///
/// # Errors
///
/// Returns the first vault error.
pub fn fetch(vault: &dyn Vault, bindings: &Bindings) -> Result<Vec<(String, Secret)>> {
    bindings
        .bound
        .iter()
        .map(|b| -> Result<(String, Secret)> { Ok((b.env_var.clone(), vault.get(&b.entry.name)?)) })
        .collect()
}
