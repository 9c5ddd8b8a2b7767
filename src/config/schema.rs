//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files. The
//! `AMSConfigurationOptions` section keeps the key names of
//! `AMSConfiguration.json` so existing deployments load unchanged.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ADS/TCP port used for both the local listener and remote routes.
pub const DEFAULT_TCP_PORT: u16 = 48898;

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Endpoint addresses (raw strings, validated at startup).
    #[serde(rename = "AMSConfigurationOptions")]
    pub ams: AmsConfigurationOptions,

    /// Engine binding, shutdown and restart settings.
    pub supervisor: SupervisorSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Raw endpoint configuration as it appears in the config file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AmsConfigurationOptions {
    #[serde(rename = "LocalAMSNetID")]
    pub local_ams_net_id: String,

    #[serde(rename = "TargetAMSNetID")]
    pub target_ams_net_id: String,

    #[serde(rename = "TargetIPAddress")]
    pub target_ip_address: String,
}

/// Supervisor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupervisorSettings {
    /// Port the engine listens on.
    pub local_port: u16,

    /// Port used to reach remote routers.
    pub remote_port: u16,

    /// Address the engine listener binds to.
    pub bind_address: IpAddr,

    /// Upper bound for a stop request to be acknowledged, in milliseconds.
    pub shutdown_timeout_ms: u64,

    /// What to do after a runtime fault.
    pub restart: RestartConfig,
}

impl SupervisorSettings {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            local_port: DEFAULT_TCP_PORT,
            remote_port: DEFAULT_TCP_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            shutdown_timeout_ms: 10_000,
            restart: RestartConfig::default(),
        }
    }
}

/// Restart policy after a runtime fault.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestartMode {
    /// A fault is terminal; the process exits.
    #[default]
    Never,
    /// Build a fresh supervisor after a runtime fault, up to `max_restarts`.
    OnFailure,
}

/// Restart configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestartConfig {
    pub policy: RestartMode,

    /// Maximum number of restarts before giving up.
    pub max_restarts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            policy: RestartMode::Never,
            max_restarts: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.supervisor.local_port, 48898);
        assert_eq!(config.supervisor.remote_port, 48898);
        assert!(config.supervisor.bind_address.is_loopback());
        assert_eq!(config.supervisor.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(config.supervisor.restart.policy, RestartMode::Never);
        assert!(config.ams.local_ams_net_id.is_empty());
    }

    #[test]
    fn test_appsettings_json_shape() {
        let json = r#"{
            "AMSConfigurationOptions": {
                "LocalAMSNetID": "1.2.3.4.1.1",
                "TargetAMSNetID": "5.6.7.8.1.1",
                "TargetIPAddress": "10.0.0.5"
            }
        }"#;
        let config: ServiceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ams.local_ams_net_id, "1.2.3.4.1.1");
        assert_eq!(config.ams.target_ams_net_id, "5.6.7.8.1.1");
        assert_eq!(config.ams.target_ip_address, "10.0.0.5");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_restart_policy_names() {
        let toml_src = r#"
            [supervisor.restart]
            policy = "on-failure"
            max_restarts = 2
        "#;
        let config: ServiceConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.supervisor.restart.policy, RestartMode::OnFailure);
        assert_eq!(config.supervisor.restart.max_restarts, 2);
        assert_eq!(config.supervisor.restart.base_delay_ms, 500);
    }
}
