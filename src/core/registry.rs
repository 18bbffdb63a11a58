//! Legacy local registry.
//!
//! Before tags carried the grouping, a local JSON file mapped each resource
//! to its secret names and the env vars they populate:
//!
//! ```json
//! { "myapp": { "db-password": "DB_PASSWORD" } }
//! ```
//!
//! `load` still consults it for entries without an `env-var-name` tag, and
//! `migrate` turns it into tags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::secret;
use crate::error::{Error, Result};

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub resource: String,
    pub name: String,
    pub env_var: String,
}

impl RegistryEntry {
    /// The vault entry name this row refers to.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if resource or name is malformed.
    pub fn entry_name(&self) -> Result<String> {
        secret::entry_name(&self.resource, &self.name)
    }
}

/// The parsed registry file.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: BTreeMap<String, BTreeMap<String, String>>,
    path: PathBuf,
}

impl Registry {
    /// Load the registry at `path`. A missing file is an empty registry.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no legacy registry");
            return Ok(Self {
                resources: BTreeMap::new(),
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let resources = serde_json::from_str(&contents).map_err(|e| {
            Error::Registry(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let registry = Self {
            resources,
            path: path.to_path_buf(),
        };
        debug!(path = %path.display(), entries = registry.len(), "legacy registry loaded");
        Ok(registry)
    }

    /// Write the registry back to its file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.resources)?;
        std::fs::write(&self.path, contents + "\n")?;
        Ok(())
    }

    /// Env var recorded for (resource, name).
    pub fn lookup(&self, resource: &str, name: &str) -> Option<&str> {
        self.resources
            .get(resource)
            .and_then(|names| names.get(name))
            .map(String::as_str)
    }

    /// Env var recorded for a vault entry name, trying every resource whose
    /// prefix matches.
    pub fn lookup_entry(&self, entry: &str) -> Option<&str> {
        self.resources.iter().find_map(|(resource, names)| {
            secret::strip_resource(entry, resource)
                .and_then(|name| names.get(name))
                .map(String::as_str)
        })
    }

    /// All rows, ordered by resource then name.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.resources
            .iter()
            .flat_map(|(resource, names)| {
                names.iter().map(move |(name, env_var)| RegistryEntry {
                    resource: resource.clone(),
                    name: name.clone(),
                    env_var: env_var.clone(),
                })
            })
            .collect()
    }

    /// Remove a row; drops the resource once it has no names left.
    pub fn remove(&mut self, resource: &str, name: &str) -> bool {
        let Some(names) = self.resources.get_mut(resource) else {
            return false;
        };
        let removed = names.remove(name).is_some();
        if names.is_empty() {
            self.resources.remove(resource);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
