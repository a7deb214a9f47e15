use std::env;
use std::path::PathBuf;

use aoiscan_core::config::LayeredConfig;
use aoiscan_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,

    /// Optional TOML file with analysis settings
    pub config_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            config_file: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("AOISCAN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("AOISCAN_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let config_file = env::var("AOISCAN_CONFIG").ok().filter(|p| !p.is_empty()).map(PathBuf::from);

        Self { port, cors_origin, config_file }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Analysis settings: defaults, then the config file, then `AOISCAN_*` variables
    pub fn analysis_config(&self) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_file {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["AOISCAN_PORT", "AOISCAN_CORS_ORIGIN", "AOISCAN_CONFIG"] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ApiConfig::from_env();
        assert_eq!(config.port, 3001);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert!(config.config_file.is_none());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("AOISCAN_PORT", "8080");
        env::set_var("AOISCAN_CORS_ORIGIN", "https://maps.example.com");
        let config = ApiConfig::from_env();
        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "https://maps.example.com");
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        clear_env();
        env::set_var("AOISCAN_PORT", "not-a-port");
        let config = ApiConfig::from_env();
        clear_env();

        assert_eq!(config.port, 3001);
    }
}
