//! Delete command.

use tracing::info;

use crate::cli::output;
use crate::core::resolve::SecretRef;
use crate::core::vault::Vault;
use crate::error::Result;

/// Delete a secret, optionally purging it.
pub fn execute(vault: &dyn Vault, name: &str, resource: Option<String>, purge: bool) -> Result<()> {
    let entry = SecretRef::new(name, resource).entry_name()?;
    info!("Deleting secret: {} (purge: {})", entry, purge);

    vault.delete(&entry, purge)?;

    if purge {
        output::success(&format!("deleted and purged {}", output::key(&entry)));
    } else {
        output::success(&format!("deleted {}", output::key(&entry)));
        output::hint("the vault keeps it soft-deleted; pass --purge to remove it for good");
    }
    Ok(())
}
