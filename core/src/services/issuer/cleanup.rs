//! Token cleanup service for periodic removal of long-expired tokens
//!
//! Expired tokens are already rejected on redemption; this job only keeps the
//! token table from growing without bound.

use chrono::{DateTime, Duration, Utc};
use qr_shared::AttendanceConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::TokenRepository;
use crate::services::clock::Clock;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long expired tokens are kept for history and statistics (in hours)
    pub retention_hours: i64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            retention_hours: 24,
            enabled: true,
        }
    }
}

impl From<&AttendanceConfig> for TokenCleanupConfig {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            retention_hours: config.retention_hours,
            enabled: config.cleanup_interval_seconds > 0,
        }
    }
}

/// Service for cleaning up expired attendance tokens
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: TokenCleanupConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes tokens whose expiry lies more than `retention_hours` in the past.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();
        let Some(cutoff) = self.cutoff() else {
            error!(
                retention_hours = self.config.retention_hours,
                "Token retention is out of range, skipping cleanup"
            );
            result.errors.push(format!(
                "Token retention of {} hours is out of range",
                self.config.retention_hours
            ));
            return Ok(result);
        };

        match self.repository.delete_expired_before(cutoff).await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
                info!("Deleted {} expired attendance tokens", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Instant before which expired tokens are deleted
    ///
    /// `None` for a negative retention or one that does not fit the calendar.
    fn cutoff(&self) -> Option<DateTime<Utc>> {
        if self.config.retention_hours < 0 {
            return None;
        }
        Duration::try_hours(self.config.retention_hours)
            .and_then(|retention| self.clock.now().checked_sub_signed(retention))
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired tokens deleted
    pub expired_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
