use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use qr_core::errors::DomainError;
use qr_core::repositories::{SessionDirectory, TokenRepository};

use crate::app::AppState;
use crate::dto::RedeemTokenRequest;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/attendance/redeem
///
/// Records one scan of the token shown on screen. Any authenticated caller
/// may redeem; recording who attended belongs to the attendance log.
///
/// ## Errors
/// - 400 for an empty or oversized token
/// - 422 when the token is unknown, superseded or expired, or its session
///   is inactive or has ended
pub async fn redeem_token<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    auth: AuthContext,
    request: web::Json<RedeemTokenRequest>,
) -> HttpResponse
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        let error = DomainError::Validation {
            message: errors.to_string(),
        };
        return handle_domain_error(&req, &error);
    }

    match state.issuer.redeem(&request.token).await {
        Ok(redemption) => {
            log::info!(
                "Token redeemed for session {} by {} (scan #{})",
                redemption.session_id,
                auth.subject,
                redemption.scan_count
            );
            HttpResponse::Ok().json(redemption)
        }
        Err(e) => handle_domain_error(&req, &e),
    }
}
