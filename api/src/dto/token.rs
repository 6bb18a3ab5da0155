//! Request and response bodies of the attendance token endpoints

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use validator::Validate;

use qr_core::domain::entities::AttendanceToken;
use qr_core::domain::value_objects::{SessionId, TokenSummary};

/// Body of `POST /attendance-sessions/{id}/token`; may be omitted entirely
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IssueTokenRequest {
    /// Invalidate the current token and mint a new one
    #[serde(default)]
    pub force: bool,
}

/// Issued token as seen by display clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssueTokenResponse {
    pub session_id: SessionId,
    pub token: String,
    /// RFC 3339 with millisecond precision
    pub expires_at: String,
    /// Epoch seconds
    pub expires_at_ts: i64,
    pub ttl_seconds: i64,
}

impl From<&AttendanceToken> for IssueTokenResponse {
    fn from(token: &AttendanceToken) -> Self {
        Self {
            session_id: token.session_id,
            token: token.token.clone(),
            expires_at: token.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            expires_at_ts: token.expires_at.timestamp(),
            ttl_seconds: token.ttl().num_seconds(),
        }
    }
}

/// Query of `GET /attendance-sessions/{id}/tokens`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentTokensQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecentTokensResponse {
    pub session_id: SessionId,
    pub tokens: Vec<TokenSummary>,
}

/// Body of `POST /attendance/redeem`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RedeemTokenRequest {
    #[validate(length(min = 1, max = 64, message = "Token must be 1-64 characters"))]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_issue_response_fields() {
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        let token = AttendanceToken::issue(
            SessionId::new(5),
            "ABC123".to_string(),
            issued_at,
            Duration::seconds(180),
        );

        let response = IssueTokenResponse::from(&token);

        assert_eq!(response.expires_at, "2024-03-04T08:03:00.000Z");
        assert_eq!(response.expires_at_ts, issued_at.timestamp() + 180);
        assert_eq!(response.ttl_seconds, 180);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["session_id"], 5);
    }

    #[test]
    fn test_issue_request_defaults_to_not_forced() {
        let request: IssueTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.force);
    }

    #[test]
    fn test_redeem_request_validation() {
        let empty = RedeemTokenRequest { token: String::new() };
        assert!(empty.validate().is_err());

        let ok = RedeemTokenRequest { token: "ABC123".to_string() };
        assert!(ok.validate().is_ok());
    }
}
