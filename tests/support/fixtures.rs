//! Test fixtures and constants.

/// Vault name used by configured test environments.
pub const VAULT: &str = "team-vault";

/// A value that needs escaping in every shell dialect.
pub const TRICKY_VALUE: &str = r#"it's "quoted" $HOME `id` \n; rm -rf /"#;

/// JSON for one secret as `az keyvault secret show/list` prints it.
///
/// `value` is omitted for list items.
pub fn secret_json(
    name: &str,
    value: Option<&str>,
    resource: Option<&str>,
    env_var: Option<&str>,
) -> serde_json::Value {
    let mut tags = serde_json::Map::new();
    if let Some(resource) = resource {
        tags.insert("resource".into(), resource.into());
    }
    if let Some(env_var) = env_var {
        tags.insert("env-var-name".into(), env_var.into());
    }

    let mut secret = serde_json::json!({
        "attributes": {
            "enabled": true,
            "updated": "2024-03-02T11:30:00+00:00"
        },
        "id": format!("https://{}.vault.azure.net/secrets/{}", VAULT, name),
        "name": name,
        "tags": tags,
    });
    if let Some(value) = value {
        secret["value"] = value.into();
    }
    secret
}

/// Sample legacy registry.
pub const SAMPLE_REGISTRY: &str = r#"{
    "myapp": { "db": "DB_URL", "gone": "GONE" }
}"#;
