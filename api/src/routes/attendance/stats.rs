use actix_web::{web, HttpRequest, HttpResponse};

use qr_core::repositories::{SessionDirectory, TokenRepository};

use crate::app::AppState;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/tokens/stats
///
/// Issuance statistics over every stored token, with hourly buckets for the
/// current UTC day. Restricted to operators.
pub async fn token_stats<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    if let Err(e) = auth.operator() {
        return handle_domain_error(&req, &e);
    }

    match state.issuer.stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => handle_domain_error(&req, &e),
    }
}
