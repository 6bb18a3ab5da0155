//! Configuration for the token issuer

use chrono::Duration;
use qr_shared::AttendanceConfig;

use crate::domain::entities::{DEFAULT_TOKEN_LENGTH, DEFAULT_TOKEN_TTL_SECONDS};

/// Upper bound for the recent-token history page size
pub const MAX_RECENT_TOKENS_LIMIT: usize = 100;

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Token lifetime in seconds
    pub token_ttl_seconds: i64,
    /// Number of characters in a token value
    pub token_length: usize,
    /// Default page size of the recent-token history
    pub recent_tokens_limit: usize,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            token_length: DEFAULT_TOKEN_LENGTH,
            recent_tokens_limit: 10,
        }
    }
}

impl IssuerConfig {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl_seconds)
    }

    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds.max(1);
        self
    }

    /// Resolve a requested history page size
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.recent_tokens_limit)
            .clamp(1, MAX_RECENT_TOKENS_LIMIT)
    }
}

impl From<&AttendanceConfig> for IssuerConfig {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            token_ttl_seconds: config.token_ttl_seconds.max(1),
            token_length: config.token_length,
            recent_tokens_limit: config.recent_tokens_limit,
        }
    }
}
