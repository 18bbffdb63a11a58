//! Vault backends.
//!
//! [`Vault`] is the seam between commands and the secret store. [`AzCli`]
//! drives Azure Key Vault through the `az` CLI; [`MemoryVault`] keeps
//! entries in-process.

mod az;
mod memory;

pub use az::AzCli;
pub use memory::MemoryVault;

use crate::core::secret::{Secret, SecretEntry, Tags};
use crate::error::{Result, VaultError};

/// Secret store operations used by the CLI.
pub trait Vault {
    /// Backend name, for logs and messages.
    fn name(&self) -> &'static str;

    /// All entries with their tags, without values.
    fn list(&self) -> Result<Vec<SecretEntry>>;

    /// One entry with its value.
    fn get(&self, name: &str) -> Result<Secret>;

    /// Create a new version of `name` with `value` and `tags`.
    fn set(&self, name: &str, value: &str, tags: &Tags) -> Result<SecretEntry>;

    /// Replace the tags on the current version of `name`.
    fn set_tags(&self, name: &str, tags: &Tags) -> Result<SecretEntry>;

    /// Delete `name`, purging the soft-deleted secret when `purge` is set.
    fn delete(&self, name: &str, purge: bool) -> Result<()>;

    /// Entry metadata for `name`, or `None` if it does not exist.
    fn find(&self, name: &str) -> Result<Option<SecretEntry>> {
        match self.get(name) {
            Ok(secret) => Ok(Some(secret.entry().clone())),
            Err(crate::error::Error::Vault(VaultError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
