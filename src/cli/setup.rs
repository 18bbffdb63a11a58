//! Setup command.
//!
//! Writes `config.toml` with the vault name, resource group and
//! subscription, and checks that `az` is available. Vault provisioning and
//! login are left to `az` itself.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::shell::Dialect;
use crate::core::vault::AzCli;
use crate::error::{ConfigError, Error, Result};

/// Arguments for `kvenv setup`.
#[derive(Debug, Clone, Default)]
pub struct SetupArgs {
    pub vault: Option<String>,
    pub resource_group: Option<String>,
    pub subscription: Option<String>,
    pub force: bool,
    pub verify: bool,
}

/// Write the configuration file.
pub fn execute(args: SetupArgs) -> Result<()> {
    let path = Config::config_path()?;
    let existing = Config::read(&path)?;

    if existing.vault.is_some() && !args.force {
        return Err(ConfigError::AlreadyInitialized(path.display().to_string()).into());
    }

    let vault = args
        .vault
        .ok_or_else(|| Error::Other("setup needs a vault name: pass --vault <NAME>".to_string()))?;

    let config = Config {
        vault: Some(vault.clone()),
        resource_group: args.resource_group,
        subscription: args.subscription,
        registry: existing.registry,
    };
    config.validate()?;
    config.save(&path)?;

    output::success("kvenv configured");
    output::kv("vault ", &vault);
    if let Some(group) = &config.resource_group {
        output::kv("group ", group);
    }
    if let Some(subscription) = &config.subscription {
        output::kv("sub   ", subscription);
    }
    output::kv("config", path.display());

    match AzCli::locate() {
        Ok(program) => {
            output::kv("az    ", program.display());
            if args.verify {
                let az = AzCli::with_program(program, vault.as_str(), config.subscription.clone());
                let uri = az.show_vault(config.resource_group.as_deref())?;
                output::success(&format!("vault reachable {}", uri));
            }
        }
        Err(e) => {
            output::warn(&e.to_string());
            if args.verify {
                return Err(e);
            }
        }
    }

    output::blank();
    output::hint(&format!("load secrets with: {}", output::cmd(&integration_line(Dialect::detect()))));
    Ok(())
}

/// How to load a resource into the given shell.
pub fn integration_line(dialect: Dialect) -> String {
    match dialect {
        Dialect::Fish => "kvenv load -r <resource> | source".to_string(),
        Dialect::PowerShell => {
            "kvenv load -r <resource> --shell powershell | Out-String | Invoke-Expression".to_string()
        }
        _ => "eval \"$(kvenv load -r <resource>)\"".to_string(),
    }
}
