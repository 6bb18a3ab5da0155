use actix_web::{web, HttpRequest, HttpResponse};

use qr_core::domain::value_objects::SessionId;
use qr_core::repositories::{SessionDirectory, TokenRepository};

use crate::app::AppState;
use crate::dto::{RecentTokensQuery, RecentTokensResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/attendance-sessions/{id}/tokens?limit=
///
/// Lists the session's most recently issued tokens, newest first. The limit
/// defaults to the configured value and is capped at 100.
pub async fn recent_tokens<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    auth: AuthContext,
    path: web::Path<i64>,
    query: web::Query<RecentTokensQuery>,
) -> HttpResponse
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    let session_id = SessionId::new(path.into_inner());

    let result = match auth.operator() {
        Ok(operator) => {
            state
                .issuer
                .recent_tokens(session_id, &operator, query.limit)
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(tokens) => HttpResponse::Ok().json(RecentTokensResponse { session_id, tokens }),
        Err(e) => handle_domain_error(&req, &e),
    }
}
