//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Fiscal authorization (SRI) configuration.
    pub sri: SriConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Fiscal authorization (SRI) configuration.
///
/// Each external call (signing, transmission, authorization query) is a
/// network round-trip to a slow service; every one must have a finite
/// timeout so one stuck document cannot block a sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct SriConfig {
    /// Timeout in seconds for a single signing call.
    #[serde(default = "default_sign_timeout")]
    pub sign_timeout_secs: u64,
    /// Timeout in seconds for a single transmission call.
    #[serde(default = "default_transmit_timeout")]
    pub transmit_timeout_secs: u64,
    /// Timeout in seconds for a single authorization query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    /// Interval in seconds between retry sweeps of in-process documents.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_sign_timeout() -> u64 {
    20
}

fn default_transmit_timeout() -> u64 {
    30
}

fn default_query_timeout() -> u64 {
    30
}

fn default_sweep_interval() -> u64 {
    300
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BALANZA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_sign_timeout(), 20);
        assert_eq!(default_transmit_timeout(), 30);
        assert_eq!(default_query_timeout(), 30);
        assert_eq!(default_sweep_interval(), 300);
    }
}
