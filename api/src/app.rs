//! Application state and factory
//!
//! This module holds the state shared by every worker and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpRequest,
};

use qr_core::repositories::{SessionDirectory, TokenRepository};
use qr_core::services::TokenIssuerService;
use qr_shared::{Environment, JwtConfig};

use crate::handlers::error::{
    extract_language, json_error_handler, not_found_response, path_error_handler,
    query_error_handler,
};
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes::attendance::{issue_token, recent_tokens, redeem_token, token_stats};
use crate::routes::health::{api_documentation, health_check};

/// State shared by the route handlers
pub struct AppState<R: TokenRepository, S: SessionDirectory> {
    pub issuer: Arc<TokenIssuerService<R, S>>,
    /// Storage backend label reported by the health check
    pub storage: String,
}

impl<R: TokenRepository, S: SessionDirectory> AppState<R, S> {
    pub fn new(issuer: Arc<TokenIssuerService<R, S>>, storage: impl Into<String>) -> Self {
        Self {
            issuer,
            storage: storage.into(),
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R, S>(
    app_state: web::Data<AppState<R, S>>,
    jwt: JwtConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // Order matters: security first, then CORS, then logging
        .wrap(Logger::default())
        .wrap(create_cors(environment))
        .wrap(SecurityMiddleware::for_environment(environment))
        .route("/health", web::get().to(health_check::<R, S>))
        .route("/api/v1/", web::get().to(api_documentation))
        .service(
            web::scope("/api/v1")
                .wrap(JwtAuth::new(jwt))
                .route(
                    "/attendance-sessions/{id}/token",
                    web::post().to(issue_token::<R, S>),
                )
                .route(
                    "/attendance-sessions/{id}/tokens",
                    web::get().to(recent_tokens::<R, S>),
                )
                .route("/tokens/stats", web::get().to(token_stats::<R, S>))
                .route("/attendance/redeem", web::post().to(redeem_token::<R, S>)),
        )
        .default_service(web::route().to(|req: HttpRequest| async move {
            not_found_response(extract_language(&req))
        }))
}
