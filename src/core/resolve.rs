//! Secret identity and tag resolution.
//!
//! Commands name a secret either by resource + name (`-r myapp db`) or by
//! its full entry name (`myapp-db`). Tags come from explicit flags first,
//! then from whatever is already stored on the entry. A required tag that
//! neither provides is an error naming the flag to pass.

use std::collections::BTreeMap;
use tracing::debug;

use crate::core::constants::{ENV_VAR_TAG, RESOURCE_TAG};
use crate::core::registry::Registry;
use crate::core::secret::{self, SecretEntry, Tags};
use crate::core::validation;
use crate::error::{ResolveError, Result, VaultError};

/// A secret as named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub name: String,
    pub resource: Option<String>,
}

impl SecretRef {
    pub fn new(name: impl Into<String>, resource: Option<String>) -> Self {
        Self {
            name: name.into(),
            resource,
        }
    }

    /// The vault entry name: `{resource}-{name}`, or `name` alone when no
    /// resource was given.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a part does not match the name pattern.
    pub fn entry_name(&self) -> Result<String> {
        match &self.resource {
            Some(resource) => secret::entry_name(resource, &self.name),
            None => {
                validation::validate_name(&self.name)?;
                Ok(self.name.clone())
            }
        }
    }
}

/// Tag values given explicitly through flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOverrides {
    pub resource: Option<String>,
    pub env_var: Option<String>,
}

/// Merge explicit flags over stored tags.
///
/// Unrelated stored tags are kept. Both `resource` and `env-var-name` must
/// end up set.
///
/// # Errors
///
/// Returns `ResolveError::MissingTag` when a required tag has no source, or
/// `ValidationError` when a supplied value is malformed.
pub fn resolve_tags(entry: &str, overrides: &TagOverrides, stored: Option<&Tags>) -> Result<Tags> {
    let mut tags = stored.cloned().unwrap_or_default();

    match &overrides.resource {
        Some(resource) => {
            validation::validate_resource(resource)?;
            tags.set_resource(resource.as_str());
        }
        None if tags.resource().is_none() => {
            return Err(ResolveError::MissingTag {
                entry: entry.to_string(),
                tag: RESOURCE_TAG,
                flag: "--resource",
            }
            .into());
        }
        None => {}
    }

    match &overrides.env_var {
        Some(env_var) => {
            validation::validate_env_var(env_var)?;
            tags.set_env_var(env_var.as_str());
        }
        None => match tags.env_var() {
            Some(stored) => validation::validate_env_var(stored)?,
            None => {
                return Err(ResolveError::MissingTag {
                    entry: entry.to_string(),
                    tag: ENV_VAR_TAG,
                    flag: "--env",
                }
                .into());
            }
        },
    }

    debug!(entry, resource = ?tags.resource(), env_var = ?tags.env_var(), "resolved tags");
    Ok(tags)
}

/// Pick entries by explicit names and/or resources.
///
/// With names, each must resolve to an entry (directly or as
/// `{resource}-{name}` for one of `resources`). Without names, every entry
/// belonging to one of `resources` is selected, or all entries when no
/// resource is given. Disabled entries are never selected by resource.
///
/// # Errors
///
/// Returns `VaultError::NotFound` for an unknown name and
/// `ResolveError::NoMatch` when nothing is selected.
pub fn select(
    entries: &[SecretEntry],
    names: &[String],
    resources: &[String],
) -> Result<Vec<SecretEntry>> {
    for resource in resources {
        validation::validate_resource(resource)?;
    }

    let selected: Vec<SecretEntry> = if names.is_empty() {
        entries
            .iter()
            .filter(|e| e.enabled)
            .filter(|e| resources.is_empty() || resources.iter().any(|r| e.belongs_to(r)))
            .cloned()
            .collect()
    } else {
        let mut picked = Vec::with_capacity(names.len());
        for name in names {
            let candidates: Vec<String> = if resources.is_empty() {
                vec![name.clone()]
            } else {
                resources.iter().map(|r| format!("{}-{}", r, name)).collect()
            };
            let entry = candidates
                .iter()
                .find_map(|c| entries.iter().find(|e| &e.name == c))
                .ok_or_else(|| VaultError::NotFound(name.clone()))?;
            if !picked.iter().any(|p: &SecretEntry| p.name == entry.name) {
                picked.push(entry.clone());
            }
        }
        picked
    };

    if selected.is_empty() {
        let scope = if resources.is_empty() {
            "in the vault".to_string()
        } else {
            format!("resource {}", resources.join(", "))
        };
        return Err(ResolveError::NoMatch(scope).into());
    }

    Ok(selected)
}

/// The env var an entry populates: its `env-var-name` tag, else the legacy
/// registry.
pub fn env_var_for(entry: &SecretEntry, registry: &Registry) -> Option<String> {
    if let Some(env_var) = entry.tags.env_var() {
        return Some(env_var.to_string());
    }
    let from_registry = match entry.resource() {
        Some(resource) => registry.lookup(resource, entry.short_name()),
        None => registry.lookup_entry(&entry.name),
    };
    if from_registry.is_some() {
        debug!(entry = %entry.name, "env var name taken from legacy registry");
    }
    from_registry.map(str::to_string)
}

/// An entry paired with the env var it populates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub entry: SecretEntry,
    pub env_var: String,
}

/// Result of [`bind`]: bound entries plus those skipped for lack of an
/// env var name.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub bound: Vec<Binding>,
    pub skipped: Vec<String>,
}

impl Bindings {
    /// Env vars claimed by more than one entry, with the entries claiming
    /// them in order.
    pub fn duplicates(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for binding in &self.bound {
            seen.entry(binding.env_var.as_str())
                .or_default()
                .push(binding.entry.name.as_str());
        }
        seen.retain(|_, names| names.len() > 1);
        seen
    }

    pub fn env_vars(&self) -> Vec<&str> {
        self.bound.iter().map(|b| b.env_var.as_str()).collect()
    }
}

/// Pair each entry with its env var name.
///
/// Entries without one are an error listing all of them, unless
/// `skip_untagged` is set, in which case they are returned in `skipped`.
///
/// # Errors
///
/// Returns `ResolveError::MissingEnvVar` or a `ValidationError` for a
/// malformed stored env var name.
pub fn bind(entries: Vec<SecretEntry>, registry: &Registry, skip_untagged: bool) -> Result<Bindings> {
    let mut bindings = Bindings::default();

    for entry in entries {
        match env_var_for(&entry, registry) {
            Some(env_var) => {
                validation::validate_env_var(&env_var)?;
                bindings.bound.push(Binding { entry, env_var });
            }
            None => bindings.skipped.push(entry.name),
        }
    }

    if !bindings.skipped.is_empty() && !skip_untagged {
        return Err(ResolveError::MissingEnvVar(bindings.skipped).into());
    }

    Ok(bindings)
}
