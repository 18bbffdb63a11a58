//! Update command.
//!
//! Changes the value and/or tags of an existing secret. Flags override the
//! stored tags; anything not passed keeps its stored value.

use tracing::info;

use crate::cli::output;
use crate::core::resolve::{self, SecretRef, TagOverrides};
use crate::core::validation;
use crate::core::vault::Vault;
use crate::error::{Error, Result};

/// Update an existing secret.
pub fn execute(
    vault: &dyn Vault,
    name: &str,
    resource: Option<String>,
    value: Option<&str>,
    env_var: Option<String>,
) -> Result<()> {
    if value.is_none() && resource.is_none() && env_var.is_none() {
        return Err(Error::Other(
            "nothing to update: pass --value, --stdin, --resource or --env".to_string(),
        ));
    }

    let entry = SecretRef::new(name, resource.clone()).entry_name()?;
    let current = vault.get(&entry)?;
    info!("Updating secret: {}", entry);

    let overrides = TagOverrides { resource, env_var };
    let tags = resolve::resolve_tags(&entry, &overrides, Some(current.tags()))?;

    match value {
        Some(value) => {
            validation::validate_value(&entry, value)?;
            vault.set(&entry, value, &tags)?;
            output::success(&format!("updated {} (new version)", output::key(&entry)));
        }
        None if &tags != current.tags() => {
            vault.set_tags(&entry, &tags)?;
            output::success(&format!("updated tags on {}", output::key(&entry)));
        }
        None => {
            output::dimmed(&format!("{} already up to date", entry));
        }
    }

    output::kv("resource", tags.resource().unwrap_or_default());
    output::kv("env var ", tags.env_var().unwrap_or_default());
    Ok(())
}
