//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;

/// Separator used by environment overrides, e.g. `AMSConfigurationOptions__LocalAMSNetID`.
pub const ENV_SECTION_SEPARATOR: &str = "__";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON parse error: {}", e),
            ConfigError::Toml(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
        }
    }
}

/// Load configuration from a `.toml` file, or JSON for any other extension.
///
/// Only parses; endpoint values are validated when the supervisor starts.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).map_err(ConfigError::Toml)
    } else {
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }
}

/// Load configuration and apply overrides from the process environment.
pub fn load_config_with_env(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Override endpoint fields from `AMSConfigurationOptions__<Key>` variables.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let ams = &mut config.ams;
    let fields: [(&str, &mut String); 3] = [
        ("LocalAMSNetID", &mut ams.local_ams_net_id),
        ("TargetAMSNetID", &mut ams.target_ams_net_id),
        ("TargetIPAddress", &mut ams.target_ip_address),
    ];

    for (key, slot) in fields {
        let var = format!("AMSConfigurationOptions{ENV_SECTION_SEPARATOR}{key}");
        if let Some(value) = lookup(&var) {
            tracing::debug!(variable = %var, "Configuration value overridden from environment");
            *slot = value;
        }
    }
}
