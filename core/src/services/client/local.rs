//! In-process issuer client
//!
//! Lets a display run in the same process as the issuer, e.g. a kiosk build
//! or the integration tests, without going through HTTP.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::Operator;
use crate::domain::value_objects::{IssuedToken, SessionId};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{SessionDirectory, TokenRepository};
use crate::services::issuer::TokenIssuerService;

use super::boundary::IssuerClient;
use super::error::ClientError;

/// Issuer client calling a [`TokenIssuerService`] directly
pub struct LocalIssuerClient<R: TokenRepository, S: SessionDirectory> {
    issuer: Arc<TokenIssuerService<R, S>>,
    operator: Operator,
}

impl<R: TokenRepository, S: SessionDirectory> LocalIssuerClient<R, S> {
    pub fn new(issuer: Arc<TokenIssuerService<R, S>>, operator: Operator) -> Self {
        Self { issuer, operator }
    }
}

#[async_trait]
impl<R, S> IssuerClient for LocalIssuerClient<R, S>
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    async fn request_token(
        &self,
        session_id: SessionId,
        force: bool,
    ) -> Result<IssuedToken, ClientError> {
        self.issuer
            .issue(session_id, &self.operator, force)
            .await
            .map(|token| IssuedToken::from(&token))
            .map_err(client_error)
    }
}

fn client_error(err: DomainError) -> ClientError {
    match err {
        DomainError::Unauthorized => ClientError::Unauthorized,
        DomainError::NotFound { .. } | DomainError::Token(TokenError::NoActiveSession) => {
            ClientError::NoActiveSession
        }
        other => ClientError::transport(other.to_string()),
    }
}
