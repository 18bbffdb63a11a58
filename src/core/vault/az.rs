//! Azure Key Vault backend using the `az` CLI.
//!
//! ## Requirements
//!
//! - `az` CLI installed (or `KVENV_AZ` pointing at it)
//! - `az login` already done; kvenv never authenticates on its own
//!
//! Every call runs one `az` process with `-o json`. Failures are surfaced
//! with az's stderr verbatim.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::Vault;
use crate::core::constants;
use crate::core::secret::{Secret, SecretEntry, Tags};
use crate::error::{Result, VaultError};

/// Key Vault backend driving the `az` CLI.
#[derive(Debug, Clone)]
pub struct AzCli {
    program: PathBuf,
    vault: String,
    subscription: Option<String>,
}

impl AzCli {
    /// Create a backend for `vault`, locating the `az` binary.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::CliNotFound` if `az` cannot be found.
    pub fn new(vault: impl Into<String>, subscription: Option<String>) -> Result<Self> {
        Ok(Self::with_program(Self::locate()?, vault, subscription))
    }

    /// Create a backend with an explicit `az` binary.
    pub fn with_program(
        program: impl Into<PathBuf>,
        vault: impl Into<String>,
        subscription: Option<String>,
    ) -> Self {
        Self {
            program: program.into(),
            vault: vault.into(),
            subscription,
        }
    }

    /// Find `az`: `KVENV_AZ` first, then `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::CliNotFound` if neither yields a binary.
    pub fn locate() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(constants::AZ_ENV).filter(|p| !p.is_empty()) {
            debug!(path = ?path, "using az from {}", constants::AZ_ENV);
            return Ok(PathBuf::from(path));
        }
        which::which("az").map_err(|_| VaultError::CliNotFound.into())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn vault(&self) -> &str {
        &self.vault
    }

    /// Check that the vault exists and is reachable (`az keyvault show`).
    ///
    /// # Errors
    ///
    /// Returns `VaultError::CommandFailed` with az's message otherwise.
    pub fn show_vault(&self, resource_group: Option<&str>) -> Result<String> {
        let mut args = vec!["keyvault", "show", "--name", self.vault.as_str()];
        if let Some(group) = resource_group {
            args.extend(["--resource-group", group]);
        }
        let stdout = self.run(&args, None)?;
        let info: AzVaultInfo = parse_json(&stdout)?;
        Ok(info.properties.and_then(|p| p.vault_uri).unwrap_or_default())
    }

    fn secret_args<'a>(&'a self, action: &'a str, name: &'a str) -> Vec<&'a str> {
        vec![
            "keyvault",
            "secret",
            action,
            "--vault-name",
            self.vault.as_str(),
            "--name",
            name,
        ]
    }

    /// Run `az` with `args`, returning stdout. `secret` names the entry so a
    /// not-found response maps to `VaultError::NotFound`.
    fn run(&self, args: &[&str], secret: Option<&str>) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).args(["--output", "json", "--only-show-errors"]);
        if let Some(subscription) = &self.subscription {
            cmd.args(["--subscription", subscription]);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let shown = describe(args);
        debug!(command = %shown, "running az");

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VaultError::CliNotFound
            } else {
                VaultError::Spawn {
                    program: self.program.display().to_string(),
                    source: e,
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            trace!(status = ?output.status.code(), stderr = %stderr, "az failed");
            if let Some(name) = secret.filter(|_| is_not_found(&stderr)) {
                return Err(VaultError::NotFound(name.to_string()).into());
            }
            return Err(VaultError::CommandFailed {
                command: shown,
                stderr,
            }
            .into());
        }

        trace!(bytes = output.stdout.len(), "az succeeded");
        Ok(output.stdout)
    }
}

impl Vault for AzCli {
    fn name(&self) -> &'static str {
        "az"
    }

    fn list(&self) -> Result<Vec<SecretEntry>> {
        let stdout = self.run(
            &["keyvault", "secret", "list", "--vault-name", self.vault.as_str()],
            None,
        )?;
        let raw: Vec<AzSecret> = parse_json(&stdout)?;
        let entries = raw
            .into_iter()
            .map(AzSecret::into_entry)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = entries.len(), vault = %self.vault, "listed secrets");
        Ok(entries)
    }

    fn get(&self, name: &str) -> Result<Secret> {
        let stdout = self.run(&self.secret_args("show", name), Some(name))?;
        let raw: AzSecret = parse_json(&stdout)?;
        raw.into_secret()
    }

    fn set(&self, name: &str, value: &str, tags: &Tags) -> Result<SecretEntry> {
        // `=` form so values starting with '-' are not read as flags.
        let value_arg = format!("--value={}", value);
        let tag_args = tags.to_args();

        let mut args = self.secret_args("set", name);
        args.push(&value_arg);
        if !tag_args.is_empty() {
            args.push("--tags");
            args.extend(tag_args.iter().map(String::as_str));
        }

        let stdout = self.run(&args, None)?;
        let raw: AzSecret = parse_json(&stdout)?;
        raw.into_entry()
    }

    fn set_tags(&self, name: &str, tags: &Tags) -> Result<SecretEntry> {
        let tag_args = tags.to_args();

        let mut args = self.secret_args("set-attributes", name);
        args.push("--tags");
        if tag_args.is_empty() {
            // az clears tags when given an empty string
            args.push("");
        } else {
            args.extend(tag_args.iter().map(String::as_str));
        }

        let stdout = self.run(&args, Some(name))?;
        let raw: AzSecret = parse_json(&stdout)?;
        raw.into_entry()
    }

    fn delete(&self, name: &str, purge: bool) -> Result<()> {
        self.run(&self.secret_args("delete", name), Some(name))?;
        if purge {
            self.run(&self.secret_args("purge", name), Some(name))?;
        }
        Ok(())
    }
}

/// Secret bundle or list item as printed by `az keyvault secret ...`.
#[derive(Debug, Deserialize)]
struct AzSecret {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    attributes: Option<AzAttributes>,
}

#[derive(Debug, Deserialize)]
struct AzAttributes {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzVaultInfo {
    #[serde(default)]
    properties: Option<AzVaultProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzVaultProperties {
    #[serde(default)]
    vault_uri: Option<String>,
}

impl AzSecret {
    fn into_entry(self) -> Result<SecretEntry> {
        let name = self
            .name
            .or_else(|| self.id.as_deref().and_then(name_from_id))
            .ok_or_else(|| VaultError::InvalidResponse("secret without name or id".to_string()))?;

        let mut entry = SecretEntry::new(name, Tags::from_map(self.tags.unwrap_or_default()));
        if let Some(attributes) = self.attributes {
            entry.enabled = attributes.enabled.unwrap_or(true);
            entry.updated = attributes
                .updated
                .as_deref()
                .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&chrono::Utc));
        }
        Ok(entry)
    }

    fn into_secret(mut self) -> Result<Secret> {
        let value = self.value.take();
        let entry = self.into_entry()?;
        let value = value.ok_or_else(|| {
            VaultError::InvalidResponse(format!("secret {} has no value (disabled?)", entry.name))
        })?;
        Ok(Secret::new(entry, value))
    }
}

/// Secret name from an id like `https://v.vault.azure.net/secrets/<name>[/<version>]`.
fn name_from_id(id: &str) -> Option<String> {
    let (_, rest) = id.split_once("/secrets/")?;
    rest.split('/')
        .next()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn parse_json<T: serde::de::DeserializeOwned>(stdout: &[u8]) -> Result<T> {
    serde_json::from_slice(stdout)
        .map_err(|e| VaultError::InvalidResponse(e.to_string()).into())
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("SecretNotFound") || stderr.contains("was not found")
}

/// `az ...` with secret values redacted, for logs and error messages.
fn describe(args: &[&str]) -> String {
    let shown: Vec<&str> = args
        .iter()
        .map(|&a| if a.starts_with("--value=") { "--value=***" } else { a })
        .collect();
    format!("az {}", shown.join(" "))
}
