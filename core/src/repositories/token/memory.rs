//! In-memory implementation of TokenRepository
//!
//! Used when the server runs without a database and throughout the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::AttendanceToken;
use crate::domain::value_objects::{SessionId, TokenStats};
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Token repository backed by a vector in insertion order
pub struct InMemoryTokenRepository {
    tokens: Arc<RwLock<Vec<AttendanceToken>>>,
}

impl InMemoryTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored tokens
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Snapshot of every stored token
    pub async fn all(&self) -> Vec<AttendanceToken> {
        self.tokens.read().await.clone()
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save(&self, token: AttendanceToken) -> Result<AttendanceToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        // Token values are unique
        if tokens.iter().any(|t| t.token == token.token) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_current(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .rev()
            .find(|t| t.session_id == session_id && t.is_valid_at(now))
            .cloned())
    }

    async fn find_by_value(&self, token: &str) -> Result<Option<AttendanceToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().rev().find(|t| t.token == token).cloned())
    }

    async fn invalidate_active(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens
            .iter_mut()
            .filter(|t| t.session_id == session_id && t.is_valid_at(now))
        {
            token.invalidate_at(now);
            count += 1;
        }

        Ok(count)
    }

    async fn record_scan(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.iter_mut().find(|t| t.id == id && t.is_valid_at(now)) {
            Some(token) => {
                token.record_scan();
                Ok(Some(token.clone()))
            }
            None => Ok(None),
        }
    }

    async fn recent_for_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<AttendanceToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .rev()
            .filter(|t| t.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<TokenStats, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(TokenStats::from_tokens(tokens.iter(), now))
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|t| t.expires_at >= cutoff);
        Ok(before - tokens.len())
    }
}
