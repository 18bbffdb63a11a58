//! kvenv - Azure Key Vault secrets as shell environment variables.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kvenv::cli::output;
use kvenv::cli::{execute, Cli};
use kvenv::core::constants;
use kvenv::error::{ConfigError, Error, ResolveError, VaultError};

fn main() {
    let cli = Cli::parse();

    // Logs share stderr with status output; stdout stays clean for eval.
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kvenv=debug")
        } else {
            EnvFilter::new("kvenv=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let e = match execute(cli.command, cli.vault) {
        Ok(0) => return,
        Ok(code) => std::process::exit(code),
        Err(e) => e,
    };

    let suggestion = match &e {
        Error::Config(ConfigError::NotInitialized) => Some("run: kvenv setup --vault <name>"),
        Error::Vault(VaultError::CliNotFound) => Some("install the Azure CLI, then run: az login"),
        Error::Vault(VaultError::NotFound(_)) => Some("run: kvenv list"),
        Error::Resolve(ResolveError::MissingEnvVar(_)) => {
            Some("tag them with: kvenv update <name> --env <VAR>, or pass --skip-untagged")
        }
        _ => None,
    };

    output::error(&e.to_string());
    if let Some(hint) = suggestion {
        output::hint(hint);
    }
    std::process::exit(1);
}
