//! In-process vault backend.
//!
//! Mirrors Key Vault semantics closely enough to drive commands without
//! the `az` CLI: `set` replaces tags, `set_tags` requires an existing entry,
//! deleted names are soft-deleted until purged.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use super::Vault;
use crate::core::secret::{Secret, SecretEntry, Tags};
use crate::error::{Result, VaultError};

/// Vault kept in memory.
#[derive(Debug, Default)]
pub struct MemoryVault {
    entries: RefCell<BTreeMap<String, (SecretEntry, String)>>,
    deleted: RefCell<BTreeSet<String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names deleted but not yet purged.
    pub fn soft_deleted(&self) -> Vec<String> {
        self.deleted.borrow().iter().cloned().collect()
    }
}

impl Vault for MemoryVault {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list(&self) -> Result<Vec<SecretEntry>> {
        Ok(self
            .entries
            .borrow()
            .values()
            .map(|(entry, _)| entry.clone())
            .collect())
    }

    fn get(&self, name: &str) -> Result<Secret> {
        self.entries
            .borrow()
            .get(name)
            .map(|(entry, value)| Secret::new(entry.clone(), value.clone()))
            .ok_or_else(|| VaultError::NotFound(name.to_string()).into())
    }

    fn set(&self, name: &str, value: &str, tags: &Tags) -> Result<SecretEntry> {
        if self.deleted.borrow().contains(name) {
            return Err(VaultError::CommandFailed {
                command: "set".to_string(),
                stderr: format!("secret {} is currently in a deleted but recoverable state", name),
            }
            .into());
        }
        let mut entry = SecretEntry::new(name, tags.clone());
        entry.updated = Some(Utc::now());
        self.entries
            .borrow_mut()
            .insert(name.to_string(), (entry.clone(), value.to_string()));
        Ok(entry)
    }

    fn set_tags(&self, name: &str, tags: &Tags) -> Result<SecretEntry> {
        let mut entries = self.entries.borrow_mut();
        let (entry, _) = entries
            .get_mut(name)
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;
        entry.tags = tags.clone();
        entry.updated = Some(Utc::now());
        Ok(entry.clone())
    }

    fn delete(&self, name: &str, purge: bool) -> Result<()> {
        if self.entries.borrow_mut().remove(name).is_none() {
            return Err(VaultError::NotFound(name.to_string()).into());
        }
        if !purge {
            self.deleted.borrow_mut().insert(name.to_string());
        }
        Ok(())
    }
}
