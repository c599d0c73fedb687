//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Path to the serialized model artifact
    pub model_path: String,

    /// Version string reported with every prediction
    pub model_version: String,

    /// Abort startup when the model cannot be loaded
    pub model_required: bool,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| "models/iris_forest.json".to_string()),

            model_version: lookup("MODEL_VERSION")
                .unwrap_or_else(|| "1.0.0".to_string()),

            model_required: lookup("MODEL_REQUIRED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),

            log_json: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_version, "1.0.0");
        assert_eq!(config.model_path, "models/iris_forest.json");
        assert!(config.model_required);
        assert!(!config.log_json);
        assert!(!config.is_production());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("MODEL_PATH", "/srv/model.json"),
            ("MODEL_VERSION", "2.1.0"),
            ("MODEL_REQUIRED", "false"),
            ("LOG_FORMAT", "JSON"),
            ("ENVIRONMENT", "production"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(config.model_path, "/srv/model.json");
        assert_eq!(config.model_version, "2.1.0");
        assert!(!config.model_required);
        assert!(config.log_json);
        assert!(config.is_production());
    }

    #[test]
    fn test_unparseable_port_falls_back() {
        let config = Config::from_lookup(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.port, 8000);
    }
}
