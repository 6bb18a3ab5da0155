//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the bearer token from the Authorization header,
//! verifies it with the shared HS256 secret and injects the caller's
//! [`AuthContext`] into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use thiserror::Error;

use qr_core::domain::entities::{Operator, OperatorRole};
use qr_core::errors::DomainError;
use qr_shared::JwtConfig;

use crate::handlers::error::{extract_language, unauthorized_response};

/// Claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller id (admin or lecturer id, or student id for scanners)
    pub sub: String,
    /// Caller role, e.g. `admin`, `dosen`, `mahasiswa`
    pub role: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Reasons a request is rejected before reaching a handler
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingBearer,

    #[error("Token verification failed: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication required")]
    NotAuthenticated,
}

/// Authenticated caller injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Subject claim
    pub subject: String,
    /// Role claim, lower-cased
    pub role: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role.trim().to_lowercase(),
        }
    }

    /// The caller as a token operator
    ///
    /// # Errors
    /// `Unauthorized` when the role cannot manage attendance sessions.
    pub fn operator(&self) -> Result<Operator, DomainError> {
        let role: OperatorRole = self.role.parse().map_err(|_| DomainError::Unauthorized)?;
        Ok(Operator::new(self.subject.clone(), role))
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    config: Rc<JwtConfig>,
}

impl JwtAuth {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    /// Creates a middleware with a specific secret and default validation
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(JwtConfig::new(secret))
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    config: Rc<JwtConfig>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verified = extract_bearer_token(&req)
            .ok_or(AuthError::MissingBearer)
            .and_then(|token| verify_token(&token, &self.config));

        Box::pin(async move {
            let context = match verified {
                Ok(context) => context,
                Err(e) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), e);
                    let lang = extract_language(req.request());
                    return Ok(req
                        .into_response(unauthorized_response(lang))
                        .map_into_right_body());
                }
            };

            req.extensions_mut().insert(context);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Verifies an HS256 token against the configured secret
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<AuthContext, AuthError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_seconds;
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(AuthContext::from_claims(token_data.claims))
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            InternalError::from_response(
                AuthError::NotAuthenticated,
                unauthorized_response(extract_language(req)),
            )
            .into()
        });

        ready(result)
    }
}
