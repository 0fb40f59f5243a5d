//! Configuration validation.

use crate::config::Config;
use std::net::SocketAddr;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate the configuration.
///
/// Checks for:
/// - A known log level
/// - API and metrics listeners that do not collide
/// - A metrics path that starts with `/` when one is set
///
/// # Returns
///
/// `Ok(())` if valid, or an error message describing every problem found.
pub fn validate_config(config: &Config) -> Result<(), String> {
    let mut errors = Vec::new();

    // Check that the two listeners can both bind
    if listeners_collide(config.api.listen, config.global.metrics.address) {
        errors.push(format!(
            "api listen address {} collides with metrics address {}",
            config.api.listen, config.global.metrics.address
        ));
    }

    // Check metrics path shape
    if let Some(ref path) = config.global.metrics.path {
        if !path.starts_with('/') {
            errors.push(format!("metrics path '{}' must start with '/'", path));
        }
    }

    // Validate log level
    if let Err(e) = validate_log_level(&config.global.log_level) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// Check a log level name, from the config file or the command line.
pub fn validate_log_level(level: &str) -> Result<(), String> {
    if VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(format!(
            "invalid log level '{}', must be one of: {}",
            level,
            VALID_LOG_LEVELS.join(", ")
        ))
    }
}

/// Two listeners collide when they share a non-ephemeral port on the same
/// address, or when either side binds the wildcard address.
fn listeners_collide(a: SocketAddr, b: SocketAddr) -> bool {
    if a.port() == 0 || a.port() != b.port() {
        return false;
    }

    a.ip() == b.ip() || a.ip().is_unspecified() || b.ip().is_unspecified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn minimal_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_valid_config() {
        let config = minimal_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_same_port_collides() {
        let mut config = minimal_config();
        config.global.metrics.address = "0.0.0.0:5000".parse().unwrap();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("collides"));
    }

    #[test]
    fn test_wildcard_collides_with_loopback() {
        let mut config = minimal_config();
        config.api.listen = "127.0.0.1:8000".parse().unwrap();
        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("collides"));
    }

    #[test]
    fn test_distinct_hosts_same_port_allowed() {
        let mut config = minimal_config();
        config.api.listen = "127.0.0.1:9000".parse().unwrap();
        config.global.metrics.address = "127.0.0.2:9000".parse().unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_ephemeral_ports_never_collide() {
        let mut config = minimal_config();
        config.api.listen = "127.0.0.1:0".parse().unwrap();
        config.global.metrics.address = "127.0.0.1:0".parse().unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_relative_metrics_path() {
        let mut config = minimal_config();
        config.global.metrics.path = Some("metrics".to_string());
        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("must start with '/'"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = minimal_config();
        config.global.log_level = "verbose".to_string();
        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("invalid log level"));
    }

    #[test]
    fn test_log_level_names() {
        for level in ["trace", "debug", "info", "warn", "error", "WARN"] {
            assert!(validate_log_level(level).is_ok(), "{} rejected", level);
        }
        let err = validate_log_level("verbose").unwrap_err();
        assert!(err.contains("invalid log level 'verbose'"));
    }

    #[test]
    fn test_errors_are_joined() {
        let mut config = minimal_config();
        config.global.log_level = "loud".to_string();
        config.global.metrics.path = Some("scrape".to_string());
        let message = validate_config(&config).unwrap_err();
        assert!(message.contains("; "));
    }
}
