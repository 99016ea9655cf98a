//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::health::{ProbeTarget, TargetError, DEFAULT_HEALTH_PATH};

/// Root configuration for the health gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Probe settings shared by every service.
    pub probe: ProbeConfig,

    /// Downstream services to probe.
    pub services: Vec<ServiceConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Look up a service by name.
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Build the probe target for a service, falling back to the default path.
    pub fn target_for(&self, service: &ServiceConfig) -> Result<ProbeTarget, TargetError> {
        let path = service.path.as_deref().unwrap_or(&self.probe.default_path);
        ProbeTarget::new(service.host.clone(), service.port)?.with_path(path)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Deadline for a single probe in milliseconds.
    pub timeout_ms: u64,

    /// Path probed when a service does not set its own.
    pub default_path: String,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3000,
            default_path: DEFAULT_HEALTH_PATH.to_string(),
        }
    }
}

/// A downstream service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Unique service identifier, used in routes, logs and metrics.
    pub name: String,

    /// Hostname or IP address.
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Health path override.
    #[serde(default)]
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
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
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, path: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            name: name.into(),
            host: "127.0.0.1".into(),
            port: 4001,
            path: path.map(Into::into),
        }
    }

    #[test]
    fn test_target_uses_default_path() {
        let mut config = GatewayConfig::default();
        config.probe.default_path = "/status".into();
        config.services.push(service("users", None));
        config.services.push(service("documents", Some("/documents/health")));

        let users = config.target_for(config.service("users").unwrap()).unwrap();
        assert_eq!(users.path().as_str(), "/status");

        let documents = config.target_for(config.service("documents").unwrap()).unwrap();
        assert_eq!(documents.path().as_str(), "/documents/health");

        assert!(config.service("visitors").is_none());
    }

    #[test]
    fn test_probe_timeout_default() {
        assert_eq!(ProbeConfig::default().timeout(), Duration::from_millis(3000));
    }
}
