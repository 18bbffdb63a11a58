//! Error types for kvenv.
//!
//! Each concern has its own enum; [`Error`] wraps them so commands can use
//! a single [`Result`] alias and `?` across module boundaries.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not configured: no vault name set")]
    NotInitialized,

    #[error("already configured: {0} exists (use --force to overwrite)")]
    AlreadyInitialized(String),

    #[error("could not determine a config directory")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Local input validation errors. Raised before any vault call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },

    #[error("invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("secret value for '{0}' cannot be empty")]
    EmptyValue(String),
}

/// Errors from the vault backend.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("az CLI not found (install from https://aka.ms/azure-cli or set KVENV_AZ)")]
    CliNotFound,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    #[error("unexpected az output: {0}")]
    InvalidResponse(String),
}

/// Errors from secret identity and tag resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("secret '{entry}' has no '{tag}' tag (pass {flag})")]
    MissingTag {
        entry: String,
        tag: &'static str,
        flag: &'static str,
    },

    #[error("{} secret(s) have no env var name: {}", .0.len(), .0.join(", "))]
    MissingEnvVar(Vec<String>),

    #[error("no secrets matched {0}")]
    NoMatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
