//! Secret and tag model.
//!
//! A vault entry is named `{resource}-{name}` and carries two tags:
//! `resource` (logical grouping) and `env-var-name` (the variable it
//! populates). Any other tags on an entry are kept as-is.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use zeroize::Zeroizing;

use crate::core::constants::{ENV_VAR_TAG, NAME_SEPARATOR, RESOURCE_TAG};
use crate::core::validation;
use crate::error::Result;

/// Build the vault entry name for a resource and secret name.
///
/// # Errors
///
/// Returns `ValidationError` if either part does not match
/// `^[a-zA-Z][a-zA-Z0-9-]*$`.
pub fn entry_name(resource: &str, name: &str) -> Result<String> {
    validation::validate_resource(resource)?;
    validation::validate_name(name)?;
    Ok(format!("{}{}{}", resource, NAME_SEPARATOR, name))
}

/// Strip a resource prefix from an entry name, if present.
pub fn strip_resource<'a>(entry: &'a str, resource: &str) -> Option<&'a str> {
    entry
        .strip_prefix(resource)
        .and_then(|rest| rest.strip_prefix(NAME_SEPARATOR))
        .filter(|rest| !rest.is_empty())
}

/// Tags attached to a vault entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }

    /// The `resource` tag.
    pub fn resource(&self) -> Option<&str> {
        self.get(RESOURCE_TAG)
    }

    /// The `env-var-name` tag.
    pub fn env_var(&self) -> Option<&str> {
        self.get(ENV_VAR_TAG)
    }

    pub fn set_resource(&mut self, resource: impl Into<String>) {
        self.0.insert(RESOURCE_TAG.to_string(), resource.into());
    }

    pub fn set_env_var(&mut self, env_var: impl Into<String>) {
        self.0.insert(ENV_VAR_TAG.to_string(), env_var.into());
    }

    /// Tag lookup; empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `key=value` arguments for `az --tags`.
    pub fn to_args(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

/// A vault entry without its value, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub name: String,
    pub tags: Tags,
    pub enabled: bool,
    pub updated: Option<DateTime<Utc>>,
}

impl SecretEntry {
    pub fn new(name: impl Into<String>, tags: Tags) -> Self {
        Self {
            name: name.into(),
            tags,
            enabled: true,
            updated: None,
        }
    }

    /// Logical grouping: the `resource` tag.
    pub fn resource(&self) -> Option<&str> {
        self.tags.resource()
    }

    /// Whether this entry belongs to `resource`, by tag or, for untagged
    /// entries, by `{resource}-` name prefix.
    pub fn belongs_to(&self, resource: &str) -> bool {
        match self.resource() {
            Some(tagged) => tagged == resource,
            None => strip_resource(&self.name, resource).is_some(),
        }
    }

    /// The secret name with its resource prefix removed.
    pub fn short_name(&self) -> &str {
        self.resource()
            .and_then(|r| strip_resource(&self.name, r))
            .unwrap_or(&self.name)
    }
}

impl std::fmt::Display for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A vault entry with its value.
#[derive(Clone)]
pub struct Secret {
    entry: SecretEntry,
    value: Zeroizing<String>,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("entry", &self.entry)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl Secret {
    pub fn new(entry: SecretEntry, value: impl Into<String>) -> Self {
        Self {
            entry,
            value: Zeroizing::new(value.into()),
        }
    }

    pub fn entry(&self) -> &SecretEntry {
        &self.entry
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn tags(&self) -> &Tags {
        &self.entry.tags
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}
