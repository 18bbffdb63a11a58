//! Migrate command.
//!
//! Copies the legacy registry (`resource -> name -> ENV_VAR`) onto the vault
//! as `resource` and `env-var-name` tags, so secrets no longer depend on a
//! local file.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cli::output;
use crate::core::registry::Registry;
use crate::core::resolve::{self, TagOverrides};
use crate::core::secret::SecretEntry;
use crate::core::vault::Vault;
use crate::error::Result;

/// Outcome counts of a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries whose tags were written (or would be, on a dry run)
    pub tagged: Vec<String>,
    /// Entries whose tags already matched
    pub unchanged: Vec<String>,
    /// Registry rows with no vault entry
    pub missing: Vec<String>,
    /// Registry rows that could not be migrated
    pub invalid: Vec<String>,
    /// Entries whose stored tags disagree with the registry; left as is
    pub conflicts: Vec<String>,
}

/// Migrate registry rows to tags.
pub fn execute(vault: &dyn Vault, registry: Registry, dry_run: bool, prune: bool) -> Result<()> {
    if registry.is_empty() {
        output::dimmed(&format!("nothing to migrate ({} is empty or missing)", registry.path().display()));
        return Ok(());
    }

    let report = migrate(vault, registry, dry_run, prune)?;

    let verb = if dry_run { "would tag" } else { "tagged" };
    output::success(&format!("{} {}", verb, output::count(report.tagged.len(), "secret")));
    if !report.unchanged.is_empty() {
        output::kv("already tagged", report.unchanged.len());
    }
    if !report.missing.is_empty() {
        output::warn(&format!("not in vault: {}", report.missing.join(", ")));
    }
    if !report.conflicts.is_empty() {
        output::warn(&format!(
            "tags differ from the registry, kept the tags: {}",
            report.conflicts.join(", ")
        ));
    }
    if !report.invalid.is_empty() {
        output::warn(&format!("invalid registry rows: {}", report.invalid.join(", ")));
    }
    if dry_run {
        output::hint("run again without --dry-run to apply");
    }
    Ok(())
}

/// Apply the registry and return what happened. With `prune` (and not
/// `dry_run`), rows now covered by tags are removed from the registry file.
///
/// # Errors
///
/// Returns the first vault or registry write error.
pub fn migrate(
    vault: &dyn Vault,
    mut registry: Registry,
    dry_run: bool,
    prune: bool,
) -> Result<MigrationReport> {
    let existing: BTreeMap<String, SecretEntry> = vault
        .list()?
        .into_iter()
        .map(|e| (e.name.clone(), e))
        .collect();

    let mut report = MigrationReport::default();
    let mut done = Vec::new();

    for row in registry.entries() {
        let entry_name = match row.entry_name() {
            Ok(name) => name,
            Err(e) => {
                debug!(resource = %row.resource, name = %row.name, error = %e, "invalid registry row");
                report.invalid.push(format!("{}/{}", row.resource, row.name));
                continue;
            }
        };

        let Some(entry) = existing.get(&entry_name) else {
            report.missing.push(entry_name);
            continue;
        };

        // Stored tags win; the registry only fills in what is missing.
        let stored_resource = entry.tags.resource();
        let stored_env_var = entry.tags.env_var();
        if stored_resource.is_some_and(|r| r != row.resource)
            || stored_env_var.is_some_and(|e| e != row.env_var)
        {
            debug!(entry = %entry_name, "stored tags disagree with registry");
            report.conflicts.push(entry_name);
            continue;
        }

        let overrides = TagOverrides {
            resource: stored_resource.is_none().then(|| row.resource.clone()),
            env_var: stored_env_var.is_none().then(|| row.env_var.clone()),
        };
        let tags = match resolve::resolve_tags(&entry_name, &overrides, Some(&entry.tags)) {
            Ok(tags) => tags,
            Err(e) => {
                debug!(entry = %entry_name, error = %e, "cannot tag");
                report.invalid.push(entry_name);
                continue;
            }
        };

        if tags == entry.tags {
            report.unchanged.push(entry_name);
        } else {
            if dry_run {
                output::dimmed(&format!("  {} → {}", entry_name, row.env_var));
            } else {
                vault.set_tags(&entry_name, &tags)?;
                info!("Tagged {} with {}", entry_name, row.env_var);
            }
            report.tagged.push(entry_name);
        }
        done.push((row.resource, row.name));
    }

    if prune && !dry_run && !done.is_empty() {
        for (resource, name) in &done {
            registry.remove(resource, name);
        }
        registry.save()?;
        output::kv("pruned", format!("{} from {}", output::count(done.len(), "row"), registry.path().display()));
    }

    Ok(report)
}
