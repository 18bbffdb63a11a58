//! Input validation for kvenv operations.
//!
//! Validates resource names, secret names, env var names and values.

use crate::error::{Result, ValidationError};

/// Validate an environment variable name.
///
/// Must match `^[A-Za-z_][A-Za-z0-9_]*$`.
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_env_var(name: &str) -> Result<()> {
    let kind = "env var name";
    let first = name
        .chars()
        .next()
        .ok_or(ValidationError::Empty { kind })?;

    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(invalid(kind, name, "must start with a letter or underscore"));
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(invalid(
                kind,
                name,
                &format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            ));
        }
    }

    Ok(())
}

/// Validate a resource name.
///
/// Must match `^[a-zA-Z][a-zA-Z0-9-]*$`.
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_resource(resource: &str) -> Result<()> {
    validate_vault_name_part("resource", resource)
}

/// Validate a secret name (the part after the resource prefix).
///
/// Same pattern as resources: `^[a-zA-Z][a-zA-Z0-9-]*$`.
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(name: &str) -> Result<()> {
    validate_vault_name_part("secret name", name)
}

/// Validate a secret value. Values cannot be empty.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty.
pub fn validate_value(entry: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(entry.to_string()).into());
    }
    Ok(())
}

fn validate_vault_name_part(kind: &'static str, value: &str) -> Result<()> {
    let first = value
        .chars()
        .next()
        .ok_or(ValidationError::Empty { kind })?;

    if !first.is_ascii_alphabetic() {
        return Err(invalid(kind, value, "must start with a letter"));
    }

    for (i, ch) in value.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '-' {
            return Err(invalid(
                kind,
                value,
                &format!(
                    "invalid character '{}' at position {}. Only letters, digits, and '-' are allowed",
                    ch,
                    i + 1
                ),
            ));
        }
    }

    Ok(())
}

fn invalid(kind: &'static str, value: &str, reason: &str) -> crate::error::Error {
    ValidationError::InvalidName {
        kind,
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
