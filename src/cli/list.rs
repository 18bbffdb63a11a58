//! List command.
//!
//! Shows vault entries grouped by resource, with the env var each one
//! populates. Values are never read.

use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::output;
use crate::core::registry::Registry;
use crate::core::resolve;
use crate::core::secret::{self, SecretEntry};
use crate::core::validation;
use crate::core::vault::Vault;
use crate::error::Result;

const UNTAGGED: &str = "(untagged)";

/// List secrets, optionally limited to some resources.
pub fn execute(
    vault: &dyn Vault,
    registry: &Registry,
    resources: &[String],
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    for resource in resources {
        validation::validate_resource(resource)?;
    }

    let entries: Vec<SecretEntry> = vault
        .list()?
        .into_iter()
        .filter(|e| resources.is_empty() || resources.iter().any(|r| e.belongs_to(r)))
        .collect();

    // Untagged entries matched by a `{resource}-` prefix are grouped under that resource.
    let resource_of = |entry: &SecretEntry| -> Option<String> {
        entry
            .resource()
            .or_else(|| {
                resources
                    .iter()
                    .map(String::as_str)
                    .find(|r| entry.belongs_to(r))
            })
            .map(str::to_string)
    };

    if json {
        let items: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "resource": resource_of(e),
                    "env_var": resolve::env_var_for(e, registry),
                    "enabled": e.enabled,
                    "updated": e.updated.map(|t| t.to_rfc3339()),
                })
            })
            .collect();
        let result = serde_json::json!({
            "secrets": items,
            "count": entries.len(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        output::dimmed("no secrets stored");
        return Ok(());
    }

    let mut groups: BTreeMap<String, Vec<(&str, &SecretEntry)>> = BTreeMap::new();
    for entry in &entries {
        let (group, short) = match resource_of(entry) {
            Some(resource) => {
                let short = secret::strip_resource(&entry.name, &resource).unwrap_or(entry.name.as_str());
                (resource, short)
            }
            None => (UNTAGGED.to_string(), entry.name.as_str()),
        };
        groups.entry(group).or_default().push((short, entry));
    }

    let width = groups
        .values()
        .flatten()
        .map(|(short, _)| short.len())
        .max()
        .unwrap_or(0);
    for (resource, group) in &groups {
        writeln!(out, "{}", resource)?;
        for &(short, entry) in group {
            let env_var = resolve::env_var_for(entry, registry).unwrap_or_else(|| "-".to_string());
            let updated = entry
                .updated
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let disabled = if entry.enabled { "" } else { " (disabled)" };
            writeln!(
                out,
                "  {:<width$}  {}  {}{}",
                short,
                env_var,
                updated,
                disabled,
                width = width
            )?;
        }
    }

    output::dimmed(&output::count(entries.len(), "secret"));
    Ok(())
}
