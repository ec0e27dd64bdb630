//! Configuration management for the loan signing server.
//!
//! This module provides configuration loading from both base configuration file
//! and environment variables. Environment variables override the base configuration
//! and use the prefix `LOANSIGN_`.

use core::num::NonZeroUsize;

use config::{ConfigError, Environment, File, FileFormat};
use loan_signing_store::DbTls;
use serde::Deserialize;

/// Loads the application configuration from base config and environment variables.
///
/// Environment variables use double underscores `__` to denote nested keys.
/// For example, `LOANSIGN_APP__LISTEN` corresponds to `app.listen`.
///
/// # Errors
///
/// If the configuration could not be loaded or parsed
pub fn get_configuration() -> Result<Config, ConfigError> {
    config::Config::builder()
        .add_source(File::from_str(include_str!("base_config.ron"), FileFormat::Ron))
        .add_source(
            Environment::with_prefix(Config::CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

/// Root configuration structure containing all application settings.
#[derive(Deserialize)]
pub struct Config {
    /// Application-specific configuration
    pub app: AppConfig,

    /// Database configuration
    pub db: DbConfig,
}

/// Application-specific configuration settings.
#[derive(Deserialize)]
pub struct AppConfig {
    /// The address to listen on (e.g., "0.0.0.0:59060")
    pub listen: String,

    /// CORS allowed origins (e.g., ["http://localhost:3000", "https://example.com"])
    /// Use ["*"] to allow all origins
    pub cors_allowed_origins: Vec<String>,
}

/// Database configuration settings.
#[derive(Deserialize)]
pub struct DbConfig {
    /// The database connection URL
    pub db_url: String,

    /// Maximum number of database connections in the pool
    pub max_conn: NonZeroUsize,

    /// Whether database connections use TLS
    pub tls: DbTlsMode,
}

/// Database TLS mode as written in configuration: `disabled` or `native_roots`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbTlsMode {
    /// Plain TCP connections
    Disabled,

    /// TLS verified against the platform's root certificates
    NativeRoots,
}

impl Config {
    const CONFIG_ENV_PREFIX: &str = "LOANSIGN";
}

impl From<DbTlsMode> for DbTls {
    fn from(mode: DbTlsMode) -> Self {
        match mode {
            DbTlsMode::Disabled => DbTls::Disabled,
            DbTlsMode::NativeRoots => DbTls::NativeRoots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_config_parses() {
        let config = config::Config::builder()
            .add_source(File::from_str(include_str!("base_config.ron"), FileFormat::Ron))
            .build()
            .and_then(|config| config.try_deserialize::<Config>())
            .expect("base config must parse");

        assert_eq!(config.app.cors_allowed_origins, ["*"]);
        assert_eq!(config.db.max_conn.get(), 10);
        assert!(matches!(config.db.tls, DbTlsMode::Disabled));
    }
}
