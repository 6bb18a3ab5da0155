//! Display client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::env_or;

/// Configuration for the rotating token display client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the token issuer API
    pub issuer_base_url: String,

    /// Delay added after expiry before requesting a replacement, in milliseconds
    #[serde(default = "default_rotation_grace_ms")]
    pub rotation_grace_ms: u64,

    /// Countdown refresh interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub countdown_tick_ms: u64,

    /// Timeout for a single issuance request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Request a token as soon as a session is bound
    #[serde(default)]
    pub auto_generate_on_bind: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            issuer_base_url: String::from("http://127.0.0.1:8080"),
            rotation_grace_ms: default_rotation_grace_ms(),
            countdown_tick_ms: default_tick_ms(),
            request_timeout_seconds: default_request_timeout(),
            auto_generate_on_bind: false,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            issuer_base_url: std::env::var("ISSUER_BASE_URL")
                .unwrap_or(defaults.issuer_base_url),
            rotation_grace_ms: env_or("ROTATION_GRACE_MS", defaults.rotation_grace_ms),
            countdown_tick_ms: env_or("COUNTDOWN_TICK_MS", defaults.countdown_tick_ms).max(50),
            request_timeout_seconds: env_or(
                "ISSUER_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            auto_generate_on_bind: env_or("AUTO_GENERATE_ON_BIND", false),
        }
    }

    /// Grace delay as a `Duration`
    pub fn rotation_grace(&self) -> Duration {
        Duration::from_millis(self.rotation_grace_ms)
    }

    /// Countdown tick as a `Duration`
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Enable or disable requesting a token on bind
    pub fn with_auto_generate(mut self, enabled: bool) -> Self {
        self.auto_generate_on_bind = enabled;
        self
    }
}

fn default_rotation_grace_ms() -> u64 {
    200
}

fn default_tick_ms() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = ClientConfig::default();
        assert_eq!(config.rotation_grace(), Duration::from_millis(200));
        assert_eq!(config.countdown_tick(), Duration::from_millis(500));
        assert!(!config.auto_generate_on_bind);
    }
}
