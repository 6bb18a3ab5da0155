//! Token repository trait defining the interface for attendance token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::AttendanceToken;
use crate::domain::value_objects::{SessionId, TokenStats};
use crate::errors::DomainError;

/// Repository trait for AttendanceToken persistence operations
///
/// Implementations store every issued token; rows are never removed by the
/// issuer itself, only by the periodic cleanup job.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a newly issued token
    ///
    /// # Returns
    /// * `Ok(AttendanceToken)` - The saved token
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token value)
    async fn save(&self, token: AttendanceToken) -> Result<AttendanceToken, DomainError>;

    /// Find the newest token of a session that is valid at `now`
    async fn find_current(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError>;

    /// Find the newest token with the given value
    async fn find_by_value(&self, token: &str) -> Result<Option<AttendanceToken>, DomainError>;

    /// End the validity of every token of a session that is still valid at `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens invalidated
    async fn invalidate_active(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Atomically increment the scan count of a token that is still valid at `now`
    ///
    /// # Returns
    /// * `Ok(Some(AttendanceToken))` - The token after the increment
    /// * `Ok(None)` - The token no longer exists or is no longer valid
    async fn record_scan(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError>;

    /// Most recently issued tokens of a session, newest first
    async fn recent_for_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<AttendanceToken>, DomainError>;

    /// Issuance statistics over all stored tokens at `now`
    async fn stats(&self, now: DateTime<Utc>) -> Result<TokenStats, DomainError>;

    /// Delete tokens that expired before `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Check if a token value is currently redeemable
    async fn is_token_valid(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.find_by_value(token).await? {
            Some(token) => Ok(token.is_valid_at(now)),
            None => Ok(false),
        }
    }
}
