//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `attendance` - Token TTL, token shape and housekeeping for the issuer
//! - `auth` - Bearer token verification
//! - `client` - Rotation timing and issuer endpoint for the display client
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod attendance;
pub mod auth;
pub mod client;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use attendance::AttendanceConfig;
pub use auth::JwtConfig;
pub use client::ClientConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration; `None` runs the issuer on in-memory storage
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Bearer token verification
    pub jwt: JwtConfig,

    /// Token issuance configuration
    pub attendance: AttendanceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: None,
            jwt: JwtConfig::default(),
            attendance: AttendanceConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env_optional(),
            jwt: JwtConfig::from_env(),
            attendance: AttendanceConfig::from_env(),
            logging,
        }
    }

    /// Whether tokens are persisted in MySQL
    pub fn uses_database(&self) -> bool {
        self.database.is_some()
    }
}

/// Reads and parses an environment variable, falling back to `default`
/// when it is missing or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_memory_storage() {
        let config = AppConfig::default();
        assert!(!config.uses_database());
        assert_eq!(config.attendance.token_ttl_seconds, 180);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("QR_SHARED_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("QR_SHARED_TEST_GARBAGE", 42u32), 42);
        std::env::set_var("QR_SHARED_TEST_GARBAGE", " 7 ");
        assert_eq!(env_or("QR_SHARED_TEST_GARBAGE", 42u32), 7);
        std::env::remove_var("QR_SHARED_TEST_GARBAGE");
    }
}
