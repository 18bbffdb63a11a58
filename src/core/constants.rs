//! Constants used throughout kvenv.
//!
//! Centralizes magic strings and configuration values.

/// Directory under the user config dir holding kvenv files.
pub const APP_DIR: &str = "kvenv";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Legacy registry file name (pre-tag design), next to the config file.
pub const REGISTRY_FILE: &str = "secrets.json";

/// Env var overriding the config file location.
pub const CONFIG_ENV: &str = "KVENV_CONFIG";

/// Env var overriding the configured vault name.
pub const VAULT_ENV: &str = "KVENV_VAULT";

/// Env var overriding the configured subscription.
pub const SUBSCRIPTION_ENV: &str = "KVENV_SUBSCRIPTION";

/// Env var pointing at the `az` binary.
pub const AZ_ENV: &str = "KVENV_AZ";

/// Env var holding the tracing filter.
pub const LOG_ENV: &str = "KVENV_LOG";

/// Tag recording the logical grouping of a secret.
pub const RESOURCE_TAG: &str = "resource";

/// Tag recording the env var a secret populates.
pub const ENV_VAR_TAG: &str = "env-var-name";

/// Separator between resource and name in a vault entry name.
pub const NAME_SEPARATOR: char = '-';
