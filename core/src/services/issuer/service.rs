//! Token issuer service implementation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{AttendanceToken, Operator};
use crate::domain::value_objects::{Redemption, SessionId, TokenStats, TokenSummary};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{SessionDirectory, TokenRepository};
use crate::services::clock::Clock;

use super::config::IssuerConfig;
use super::generator::TokenGenerator;

type SessionLock = Arc<tokio::sync::Mutex<()>>;

/// Service that owns the current token of every attendance session
///
/// Issuance is serialised per session so concurrent non-forced requests
/// observe the same current token instead of minting two.
pub struct TokenIssuerService<R: TokenRepository, S: SessionDirectory> {
    tokens: Arc<R>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
    generator: TokenGenerator,
    config: IssuerConfig,
    session_locks: Mutex<HashMap<SessionId, SessionLock>>,
}

impl<R: TokenRepository, S: SessionDirectory> TokenIssuerService<R, S> {
    /// Creates a new issuer
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token repository for persistence
    /// * `sessions` - Read-only session directory
    /// * `clock` - Source of the current instant
    /// * `config` - Issuer configuration
    pub fn new(
        tokens: Arc<R>,
        sessions: Arc<S>,
        clock: Arc<dyn Clock>,
        config: IssuerConfig,
    ) -> Self {
        Self {
            tokens,
            sessions,
            clock,
            generator: TokenGenerator::new(config.token_length),
            config,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Issues the current token of a session
    ///
    /// Non-forced requests return the session's still-valid token unchanged
    /// when one exists. Forced requests invalidate it and mint a new one.
    ///
    /// # Errors
    ///
    /// * `NotFound` - The session does not exist
    /// * `Unauthorized` - The operator may not manage the session
    /// * `Token(NoActiveSession)` - The session is not open for attendance
    /// * `Token(TokenGenerationFailed)` - The new token could not be stored
    pub async fn issue(
        &self,
        session_id: SessionId,
        operator: &Operator,
        force: bool,
    ) -> Result<AttendanceToken, DomainError> {
        self.authorize(session_id, operator).await?;

        let lease = self.session_lock(session_id);
        let _guard = lease.lock.lock().await;

        // Re-read under the lock so a session closed meanwhile is honoured
        let now = self.clock.now();
        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        if !session.is_open_at(now) {
            debug!(session_id = %session_id, "Token requested for closed session");
            return Err(TokenError::NoActiveSession.into());
        }

        if force {
            let invalidated = self.tokens.invalidate_active(session_id, now).await?;
            if invalidated > 0 {
                debug!(session_id = %session_id, invalidated, "Invalidated previous token");
            }
        } else if let Some(current) = self.tokens.find_current(session_id, now).await? {
            debug!(session_id = %session_id, expires_at = %current.expires_at, "Reusing current token");
            return Ok(current);
        }

        let token = AttendanceToken::issue(
            session_id,
            self.generator.generate(),
            now,
            self.config.ttl(),
        );

        let saved = self.tokens.save(token).await.map_err(|e| {
            error!(session_id = %session_id, "Failed to store attendance token: {}", e);
            DomainError::Token(TokenError::TokenGenerationFailed)
        })?;

        info!(
            session_id = %session_id,
            operator = %operator.id,
            forced = force,
            expires_at = %saved.expires_at,
            "Issued attendance token"
        );

        Ok(saved)
    }

    /// Redeems a scanned token value
    ///
    /// # Errors
    ///
    /// * `Token(TokenInvalid)` - Unknown, superseded or expired value
    /// * `Token(SessionInactive)` - The session was deactivated
    /// * `Token(SessionEnded)` - The session's end time has passed
    pub async fn redeem(&self, value: &str) -> Result<Redemption, DomainError> {
        let value = value.trim().to_uppercase();
        if value.is_empty() {
            return Err(DomainError::Validation {
                message: "Token must not be empty".to_string(),
            });
        }

        let now = self.clock.now();
        let token = match self.tokens.find_by_value(&value).await? {
            Some(token) if token.is_valid_at(now) => token,
            _ => return Err(TokenError::TokenInvalid.into()),
        };

        let session = self
            .sessions
            .find_session(token.session_id)
            .await?
            .ok_or(TokenError::SessionInactive)?;
        if !session.is_active {
            return Err(TokenError::SessionInactive.into());
        }
        if session.has_ended_at(now) {
            return Err(TokenError::SessionEnded.into());
        }

        let scanned = self
            .tokens
            .record_scan(token.id, now)
            .await?
            .ok_or(TokenError::TokenInvalid)?;

        debug!(session_id = %scanned.session_id, scan_count = scanned.scan_count, "Token redeemed");

        Ok(Redemption {
            session_id: scanned.session_id,
            token_id: scanned.id,
            scan_count: scanned.scan_count,
            redeemed_at: now,
        })
    }

    /// Recent tokens of a session, newest first
    pub async fn recent_tokens(
        &self,
        session_id: SessionId,
        operator: &Operator,
        limit: Option<usize>,
    ) -> Result<Vec<TokenSummary>, DomainError> {
        self.authorize(session_id, operator).await?;

        let limit = self.config.resolve_limit(limit);
        let now = self.clock.now();
        let tokens = self.tokens.recent_for_session(session_id, limit).await?;

        Ok(tokens
            .iter()
            .map(|token| TokenSummary::from_token(token, now))
            .collect())
    }

    /// Issuance statistics across all sessions
    pub async fn stats(&self) -> Result<TokenStats, DomainError> {
        self.tokens.stats(self.clock.now()).await
    }

    async fn authorize(&self, session_id: SessionId, operator: &Operator) -> Result<(), DomainError> {
        if self.sessions.find_session(session_id).await?.is_none() {
            return Err(session_not_found(session_id));
        }

        if !self.sessions.can_manage(session_id, operator).await? {
            warn!(session_id = %session_id, operator = %operator.id, "Operator may not manage session");
            return Err(DomainError::Unauthorized);
        }

        Ok(())
    }

    fn session_lock(&self, session_id: SessionId) -> SessionLease<'_> {
        let mut locks = self
            .session_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        SessionLease {
            locks: &self.session_locks,
            session_id,
            lock: locks.entry(session_id).or_default().clone(),
        }
    }

    /// Number of sessions with an issuance in progress or queued
    #[cfg(test)]
    pub(crate) fn session_lock_count(&self) -> usize {
        self.session_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Handle on a session's issuance lock
///
/// Dropping the last handle removes the session's entry from the map, so
/// the map only holds sessions with an issuance in flight.
struct SessionLease<'a> {
    locks: &'a Mutex<HashMap<SessionId, SessionLock>>,
    session_id: SessionId,
    lock: SessionLock,
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // The map entry plus this handle
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.session_id);
        }
    }
}

fn session_not_found(session_id: SessionId) -> DomainError {
    DomainError::NotFound {
        resource: format!("attendance session {}", session_id),
    }
}
