use actix_web::{web, HttpResponse};
use serde_json::json;

use qr_core::repositories::{SessionDirectory, TokenRepository};
use qr_shared::HealthResponse;

use crate::app::AppState;

pub const SERVICE_NAME: &str = "presensi-qr-api";

/// Handler for GET /health
pub async fn health_check<R, S>(state: web::Data<AppState<R, S>>) -> HttpResponse
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    HttpResponse::Ok().json(HealthResponse::healthy(
        SERVICE_NAME,
        state.storage.clone(),
        env!("CARGO_PKG_VERSION"),
    ))
}

/// Handler for GET /api/v1/
pub async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Presensi QR API v1",
        "endpoints": {
            "health": "/health",
            "attendance": {
                "issue_token": {
                    "path": "/api/v1/attendance-sessions/{id}/token",
                    "method": "POST",
                    "description": "Return the current token of a session, minting one when none is valid",
                    "request_body": {
                        "force": "boolean (optional, invalidates the current token)"
                    },
                    "responses": {
                        "200": "Current or newly issued token",
                        "401": "Missing or invalid bearer token",
                        "403": "Caller may not manage this session",
                        "404": "Session not found",
                        "422": "Session inactive or ended"
                    }
                },
                "recent_tokens": {
                    "path": "/api/v1/attendance-sessions/{id}/tokens?limit=",
                    "method": "GET",
                    "description": "Most recently issued tokens of a session"
                },
                "redeem": {
                    "path": "/api/v1/attendance/redeem",
                    "method": "POST",
                    "description": "Record a scan of the token shown on screen",
                    "request_body": {
                        "token": "string (1-64 chars)"
                    }
                },
                "stats": {
                    "path": "/api/v1/tokens/stats",
                    "method": "GET",
                    "description": "Issuance statistics with hourly buckets for today"
                }
            }
        }
    }))
}
