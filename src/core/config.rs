//! Configuration file management.
//!
//! Handles reading and writing `config.toml`, which names the vault,
//! resource group and subscription. Environment variables and the
//! `--vault` flag override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// User configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Key Vault name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,
    /// Resource group holding the vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    /// Azure subscription name or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    /// Legacy registry location, when not next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

impl Config {
    /// Path to the configuration file.
    ///
    /// `KVENV_CONFIG` wins; otherwise `<config_dir>/kvenv/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if no config directory is known.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(constants::CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Read the file at `path`. A missing file is an empty config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Load the config file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::read(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `KVENV_VAULT` and `KVENV_SUBSCRIPTION`.
    pub fn apply_env(&mut self) {
        if let Some(vault) = non_empty_env(constants::VAULT_ENV) {
            debug!(vault = %vault, "vault overridden from environment");
            self.vault = Some(vault);
        }
        if let Some(subscription) = non_empty_env(constants::SUBSCRIPTION_ENV) {
            self.subscription = Some(subscription);
        }
    }

    /// Write the config to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The vault name, required by every vault operation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if no vault is configured.
    pub fn vault_name(&self) -> Result<&str> {
        self.vault
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::NotInitialized.into())
    }

    /// Location of the legacy registry.
    ///
    /// # Errors
    ///
    /// Returns error if the config path cannot be determined.
    pub fn registry_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.registry {
            return Ok(path.clone());
        }
        let config_path = Self::config_path()?;
        let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(constants::REGISTRY_FILE))
    }

    /// Validate field contents.
    ///
    /// Key Vault names are 3-24 characters of letters, digits and dashes,
    /// starting with a letter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first bad field.
    pub fn validate(&self) -> Result<()> {
        if let Some(vault) = &self.vault {
            let valid_chars = vault.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            let starts_alpha = vault.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            if !(3..=24).contains(&vault.len()) || !valid_chars || !starts_alpha {
                return Err(ConfigError::InvalidValue {
                    field: "vault",
                    reason: format!(
                        "'{}' is not a valid Key Vault name (3-24 letters, digits, or '-', starting with a letter)",
                        vault
                    ),
                }
                .into());
            }
        }
        for (field, value) in [
            ("resource_group", &self.resource_group),
            ("subscription", &self.subscription),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "cannot be empty".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
