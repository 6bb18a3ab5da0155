use actix_web::{web, HttpRequest, HttpResponse};

use qr_core::domain::value_objects::SessionId;
use qr_core::repositories::{SessionDirectory, TokenRepository};

use crate::app::AppState;
use crate::dto::{IssueTokenRequest, IssueTokenResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/attendance-sessions/{id}/token
///
/// Returns the session's current token, or a fresh one when none is valid.
/// With `{"force": true}` the current token is invalidated first.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "session_id": 12,
///     "token": "K7Q2M9X4P1R8T5W3Z6N0",
///     "expires_at": "2024-03-04T08:03:00.000Z",
///     "expires_at_ts": 1709539380,
///     "ttl_seconds": 180
/// }
/// ```
///
/// ## Errors
/// - 403 when the caller may not manage the session
/// - 404 when the session does not exist
/// - 422 when the session is inactive or has ended
pub async fn issue_token<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    auth: AuthContext,
    path: web::Path<i64>,
    body: Option<web::Json<IssueTokenRequest>>,
) -> HttpResponse
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    let session_id = SessionId::new(path.into_inner());
    let force = body.map(|b| b.force).unwrap_or(false);

    let operator = match auth.operator() {
        Ok(operator) => operator,
        Err(e) => return handle_domain_error(&req, &e),
    };

    log::info!(
        "Token requested for session {} by {} (force: {})",
        session_id,
        operator.id,
        force
    );

    match state.issuer.issue(session_id, &operator, force).await {
        Ok(token) => HttpResponse::Ok().json(IssueTokenResponse::from(&token)),
        Err(e) => handle_domain_error(&req, &e),
    }
}
