//! Command-line interface.

pub mod clear;
pub mod completions;
pub mod delete;
pub mod list;
pub mod load;
pub mod migrate;
pub mod output;
pub mod run;
pub mod save;
pub mod setup;
pub mod update;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::registry::Registry;
use crate::core::shell::Dialect;
use crate::core::vault::AzCli;
use crate::error::Result;

/// kvenv - Azure Key Vault secrets as shell environment variables.
#[derive(Parser)]
#[command(
    name = "kvenv",
    about = "Azure Key Vault secrets as shell environment variables",
    version,
    after_help = "Shell integration:\n  eval \"$(kvenv load -r myapp)\"        # bash/zsh\n  kvenv load -r myapp | source          # fish"
)]
pub struct Cli {
    /// Key Vault name (overrides config and KVENV_VAULT)
    #[arg(long, global = true, value_name = "NAME")]
    pub vault: Option<String>,

    /// Enable debug logging (or set KVENV_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Save a new secret as {resource}-{name}
    Save {
        /// Secret name (e.g., db-password)
        name: String,
        /// Secret value; read from stdin when omitted or '-'
        value: Option<String>,
        /// Resource the secret belongs to
        #[arg(short, long)]
        resource: String,
        /// Env var the secret populates
        #[arg(short, long = "env", value_name = "ENV_VAR")]
        env_var: Option<String>,
        /// Overwrite if the entry exists
        #[arg(short, long)]
        force: bool,
    },

    /// Update the value or tags of an existing secret
    Update {
        /// Secret name, or the full entry name without --resource
        name: String,
        /// Resource the secret belongs to
        #[arg(short, long)]
        resource: Option<String>,
        /// New value
        #[arg(long, conflicts_with = "stdin")]
        value: Option<String>,
        /// Read the new value from stdin
        #[arg(long)]
        stdin: bool,
        /// New env var name
        #[arg(short, long = "env", value_name = "ENV_VAR")]
        env_var: Option<String>,
    },

    /// Print export statements for secrets (use with eval)
    Load {
        #[command(flatten)]
        selection: Selection,
        /// Target shell (detected from $SHELL by default)
        #[arg(short, long, value_enum)]
        shell: Option<Shell>,
    },

    /// List secrets with their resource and env var
    List {
        /// Only show these resources
        #[arg(short, long = "resource")]
        resources: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a secret from the vault
    Delete {
        /// Secret name, or the full entry name without --resource
        name: String,
        /// Resource the secret belongs to
        #[arg(short, long)]
        resource: Option<String>,
        /// Also purge the soft-deleted secret
        #[arg(long)]
        purge: bool,
    },

    /// Print unset statements for secrets' env vars (use with eval)
    Clear {
        #[command(flatten)]
        selection: Selection,
        /// Target shell (detected from $SHELL by default)
        #[arg(short, long, value_enum)]
        shell: Option<Shell>,
    },

    /// Move the legacy secrets.json registry into vault tags
    Migrate {
        /// Registry file (defaults to secrets.json next to the config)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Remove migrated entries from the registry file
        #[arg(long)]
        prune: bool,
    },

    /// Write the config file (vault name, resource group, subscription)
    Setup {
        /// Resource group holding the vault
        #[arg(short = 'g', long)]
        resource_group: Option<String>,
        /// Azure subscription name or id
        #[arg(long)]
        subscription: Option<String>,
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
        /// Check the vault is reachable with az
        #[arg(long)]
        verify: bool,
    },

    /// Run a command with secrets injected as env vars
    Run {
        #[command(flatten)]
        selection: Selection,
        /// Command and arguments to run
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which secrets a load/clear/run acts on.
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Entries to include (names, or short names with --resource)
    pub entries: Vec<String>,
    /// Only secrets in these resources
    #[arg(short, long = "resource")]
    pub resources: Vec<String>,
    /// Warn about secrets without an env var name instead of failing
    #[arg(long)]
    pub skip_untagged: bool,
}

/// Supported shells.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell", alias = "pwsh")]
    PowerShell,
}

impl Shell {
    pub fn dialect(self) -> Dialect {
        match self {
            Shell::Bash => Dialect::Bash,
            Shell::Zsh => Dialect::Zsh,
            Shell::Fish => Dialect::Fish,
            Shell::PowerShell => Dialect::PowerShell,
        }
    }
}

/// Resolve an optional `--shell` to a printable dialect.
pub fn dialect_for(shell: Option<Shell>) -> Dialect {
    shell.map(Shell::dialect).unwrap_or_else(Dialect::detect)
}

/// Loaded configuration plus the `--vault` override.
pub struct Context {
    pub config: Config,
}

impl Context {
    /// Load config and apply the `--vault` flag.
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be read or is invalid.
    pub fn load(vault_override: Option<String>) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(vault) = vault_override {
            config.vault = Some(vault);
        }
        config.validate()?;
        Ok(Self { config })
    }

    /// The az-backed vault named by the config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` without a vault name, or
    /// `VaultError::CliNotFound` without `az`.
    pub fn vault(&self) -> Result<AzCli> {
        let name = self.config.vault_name()?;
        AzCli::new(name, self.config.subscription.clone())
    }

    /// The legacy registry (empty if the file does not exist).
    ///
    /// # Errors
    ///
    /// Returns error if the registry file exists but is malformed.
    pub fn registry(&self) -> Result<Registry> {
        Registry::load(self.config.registry_path()?)
    }
}

/// Execute a command.
///
/// Returns the process exit code: the child's for `run`, 0 otherwise.
///
/// # Errors
///
/// Returns error if the command fails; `main` prints it and exits 1.
pub fn execute(command: Command, vault_override: Option<String>) -> Result<i32> {
    use Command::*;

    if let Completions { shell } = command {
        completions::execute(shell, &mut std::io::stdout().lock())?;
        return Ok(0);
    }
    if let Setup {
        resource_group,
        subscription,
        force,
        verify,
    } = command
    {
        setup::execute(setup::SetupArgs {
            vault: vault_override,
            resource_group,
            subscription,
            force,
            verify,
        })?;
        return Ok(0);
    }

    let ctx = Context::load(vault_override)?;
    if let Run { selection, command } = command {
        return run::execute(&ctx.vault()?, &ctx.registry()?, &selection, &command);
    }

    let mut stdout = std::io::stdout().lock();
    let result = match command {
        Save {
            name,
            value,
            resource,
            env_var,
            force,
        } => {
            let value = save::read_value(value)?;
            save::execute(&ctx.vault()?, &name, &value, &resource, env_var, force)
        }
        Update {
            name,
            resource,
            value,
            stdin,
            env_var,
        } => {
            let value = if stdin {
                Some(save::read_value(None)?)
            } else {
                value.map(zeroize::Zeroizing::new)
            };
            update::execute(
                &ctx.vault()?,
                &name,
                resource,
                value.as_deref().map(String::as_str),
                env_var,
            )
        }
        Load { selection, shell } => load::execute(
            &ctx.vault()?,
            &ctx.registry()?,
            &selection,
            dialect_for(shell),
            &mut stdout,
        ),
        List { resources, json } => list::execute(
            &ctx.vault()?,
            &ctx.registry()?,
            &resources,
            json,
            &mut stdout,
        ),
        Delete {
            name,
            resource,
            purge,
        } => delete::execute(&ctx.vault()?, &name, resource, purge),
        Clear { selection, shell } => clear::execute(
            &ctx.vault()?,
            &ctx.registry()?,
            &selection,
            dialect_for(shell),
            &mut stdout,
        ),
        Migrate {
            registry,
            dry_run,
            prune,
        } => {
            let registry = match registry {
                Some(path) => Registry::load(path)?,
                None => ctx.registry()?,
            };
            migrate::execute(&ctx.vault()?, registry, dry_run, prune)
        }
        Run { .. } | Completions { .. } | Setup { .. } => Ok(()),
    };
    result.map(|()| 0)
}
