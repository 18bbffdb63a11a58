//! Save command.
//!
//! Creates `{resource}-{name}` with its `resource` and `env-var-name` tags.

use std::io::Read;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::resolve::{self, TagOverrides};
use crate::core::secret;
use crate::core::validation;
use crate::core::vault::Vault;
use crate::error::{Result, VaultError};

/// Save a new secret.
///
/// With `force`, an existing entry is overwritten and its stored tags fill
/// in any flag left out.
pub fn execute(
    vault: &dyn Vault,
    name: &str,
    value: &str,
    resource: &str,
    env_var: Option<String>,
    force: bool,
) -> Result<()> {
    let entry = secret::entry_name(resource, name)?;
    validation::validate_value(&entry, value)?;
    info!("Saving secret: {} (force: {})", entry, force);

    let existing = vault.find(&entry)?;
    if existing.is_some() && !force {
        return Err(VaultError::AlreadyExists(entry).into());
    }

    let overrides = TagOverrides {
        resource: Some(resource.to_string()),
        env_var,
    };
    let tags = resolve::resolve_tags(&entry, &overrides, existing.as_ref().map(|e| &e.tags))?;

    vault.set(&entry, value, &tags)?;

    output::success(&format!(
        "saved {} → {}",
        output::key(&entry),
        output::key(tags.env_var().unwrap_or_default())
    ));
    Ok(())
}

/// The secret value from the argument, or stdin when absent or `-`.
///
/// A single trailing newline from stdin is dropped.
///
/// # Errors
///
/// Returns error if stdin cannot be read.
pub fn read_value(arg: Option<String>) -> Result<Zeroizing<String>> {
    match arg {
        Some(value) if value != "-" => Ok(Zeroizing::new(value)),
        _ => {
            let mut buf = Zeroizing::new(String::new());
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(Zeroizing::new(trim_newline(&buf).to_string()))
        }
    }
}

fn trim_newline(value: &str) -> &str {
    value
        .strip_suffix("\r\n")
        .or_else(|| value.strip_suffix('\n'))
        .unwrap_or(value)
}
