//! Configuration data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,

    /// API listener and service profile
    #[serde(default)]
    pub api: ApiConfig,
}

/// Global configuration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Metrics exporter configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Json,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Metrics exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Address to bind the exporter
    #[serde(default = "default_metrics_address")]
    pub address: SocketAddr,

    /// Scrape path. When unset, every GET path returns the snapshot.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            address: default_metrics_address(),
            path: None,
        }
    }
}

/// API listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Address and port to listen on
    #[serde(default = "default_api_listen")]
    pub listen: SocketAddr,

    /// Which service profile to mount
    #[serde(default)]
    pub service: ServiceKind,

    /// Seed for gauge draws. Unset means a thread-local RNG.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_api_listen(),
            service: ServiceKind::default(),
            random_seed: None,
        }
    }
}

/// Service profile served on the API port.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Product updates and orders drawing down stock in kilograms.
    #[default]
    AgriStore,
    /// Market price sync and demand processing drawing down grain storage.
    Procurement,
}

impl ServiceKind {
    /// Name as written in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::AgriStore => "agri-store",
            ServiceKind::Procurement => "procurement",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_metrics_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_api_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_ports() {
        let config = Config::default();
        assert_eq!(config.api.listen, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.global.metrics.address, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.api.service, ServiceKind::AgriStore);
        assert!(config.global.metrics.path.is_none());
        assert!(config.api.random_seed.is_none());
    }

    #[test]
    fn test_service_kind_names() {
        let kind: ServiceKind = serde_yaml::from_str("procurement").unwrap();
        assert_eq!(kind, ServiceKind::Procurement);

        let kind: ServiceKind = serde_yaml::from_str("agri-store").unwrap();
        assert_eq!(kind, ServiceKind::AgriStore);
        assert_eq!(kind.to_string(), "agri-store");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.log_format, LogFormat::Json);
        assert_eq!(config.api.listen.port(), 5000);
    }
}
