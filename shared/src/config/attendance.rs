//! Attendance token issuance configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Configuration for the token issuer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttendanceConfig {
    /// Lifetime of an issued token in seconds
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: i64,

    /// Number of characters in a token value
    #[serde(default = "default_token_length")]
    pub token_length: usize,

    /// Default number of tokens returned by the recent-tokens listing
    #[serde(default = "default_recent_tokens_limit")]
    pub recent_tokens_limit: usize,

    /// How long expired tokens are kept as history before cleanup, in hours
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,

    /// Interval between cleanup runs in seconds
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: default_token_ttl_seconds(),
            token_length: default_token_length(),
            recent_tokens_limit: default_recent_tokens_limit(),
            retention_hours: default_retention_hours(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl AttendanceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_ttl_seconds: env_or("TOKEN_TTL_SECONDS", defaults.token_ttl_seconds).max(1),
            token_length: env_or("TOKEN_LENGTH", defaults.token_length).clamp(8, 64),
            recent_tokens_limit: env_or("RECENT_TOKENS_LIMIT", defaults.recent_tokens_limit),
            retention_hours: env_or("TOKEN_RETENTION_HOURS", defaults.retention_hours),
            cleanup_interval_seconds: env_or(
                "TOKEN_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
        }
    }

    /// Set the token TTL
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }
}

fn default_token_ttl_seconds() -> i64 {
    180
}

fn default_token_length() -> usize {
    20
}

fn default_recent_tokens_limit() -> usize {
    10
}

fn default_retention_hours() -> i64 {
    24
}

fn default_cleanup_interval_seconds() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_issuer_policy() {
        let config = AttendanceConfig::default();
        assert_eq!(config.token_ttl_seconds, 180);
        assert_eq!(config.token_length, 20);
        assert_eq!(config.recent_tokens_limit, 10);
    }

    #[test]
    fn test_with_ttl_seconds() {
        let config = AttendanceConfig::default().with_ttl_seconds(60);
        assert_eq!(config.token_ttl_seconds, 60);
    }
}
