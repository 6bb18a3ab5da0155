//! HTTP implementation of the display client's issuer boundary.
//!
//! Calls `POST {base}/api/v1/attendance-sessions/{id}/token` with an optional
//! bearer token and normalises the response into an [`IssuedToken`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use qr_core::domain::value_objects::{Expiry, IssuedToken, SessionId};
use qr_core::services::client::{ClientError, IssuerClient};
use qr_shared::config::ClientConfig;

use crate::InfrastructureError;

/// Request body; `force` is omitted for a plain issue
#[derive(Debug, Serialize)]
struct IssueRequest {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    force: bool,
}

/// Success body of the issue endpoint
///
/// `expires_at` wins over `expires_at_ts` when both are usable: the issuer
/// writes it with millisecond precision while the epoch field is whole seconds.
#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    session_id: Option<i64>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    expires_at: Option<Expiry>,
    #[serde(default)]
    expires_at_ts: Option<Expiry>,
    #[serde(default)]
    ttl_seconds: Option<i64>,
}

impl IssueResponse {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .as_ref()
            .and_then(Expiry::to_instant)
            .or_else(|| self.expires_at_ts.as_ref().and_then(Expiry::to_instant))
    }

    fn into_issued(self, requested: SessionId) -> Result<IssuedToken, ClientError> {
        let expires_at = self.expiry().ok_or_else(|| ClientError::InvalidResponse {
            message: "missing or unreadable expires_at".to_string(),
        })?;

        let token = self
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse {
                message: "missing token".to_string(),
            })?;

        let session_id = self.session_id.map(SessionId::new).unwrap_or(requested);

        Ok(IssuedToken::new(session_id, token, expires_at))
    }
}

/// Error body returned by the issuer on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Issuer client speaking the HTTP API
#[derive(Clone)]
pub struct HttpIssuerClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl HttpIssuerClient {
    /// Create a client for an issuer at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - Scheme, host and port of the issuer, e.g. `http://127.0.0.1:8080`
    /// * `bearer` - Operator token sent as `Authorization: Bearer`
    /// * `timeout` - Upper bound for a single request
    pub fn new(
        base_url: impl Into<String>,
        bearer: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(InfrastructureError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer: bearer.filter(|b| !b.trim().is_empty()),
        })
    }

    /// Create a client from the display configuration
    pub fn from_config(
        config: &ClientConfig,
        bearer: Option<String>,
    ) -> Result<Self, InfrastructureError> {
        Self::new(config.issuer_base_url.clone(), bearer, config.request_timeout())
    }

    /// URL of the issue endpoint for a session
    pub fn issue_url(&self, session_id: SessionId) -> String {
        format!(
            "{}/api/v1/attendance-sessions/{}/token",
            self.base_url, session_id
        )
    }

    async fn failure(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        ClientError::from_status(status.as_u16(), message)
    }
}

#[async_trait]
impl IssuerClient for HttpIssuerClient {
    async fn request_token(
        &self,
        session_id: SessionId,
        force: bool,
    ) -> Result<IssuedToken, ClientError> {
        let url = self.issue_url(session_id);
        tracing::debug!(%session_id, force, url = %url, "Requesting attendance token");

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&IssueRequest { force });
        if let Some(bearer) = &self.bearer {
            request = request.bearer_auth(bearer);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%session_id, error = %e, "Token request did not complete");
            ClientError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = Self::failure(response).await;
            tracing::warn!(%session_id, status = status.as_u16(), error = %error, "Issuer refused token request");
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT {
            return Err(ClientError::InvalidResponse {
                message: "empty response body".to_string(),
            });
        }

        let body: IssueResponse = response.json().await.map_err(|e| ClientError::InvalidResponse {
            message: e.to_string(),
        })?;

        if let Some(ttl) = body.ttl_seconds {
            tracing::trace!(%session_id, ttl_seconds = ttl, "Issuer reported token lifetime");
        }

        body.into_issued(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(json: serde_json::Value) -> IssueResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_iso_expiry_keeps_milliseconds_over_epoch_seconds() {
        let body = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at": "2023-11-14T22:16:20.900Z",
            "expires_at_ts": 1_700_000_180
        }));

        let issued = body.into_issued(SessionId::new(4)).unwrap();
        assert_eq!(
            issued.expires_at,
            Utc.timestamp_millis_opt(1_700_000_180_900).unwrap()
        );
        assert_eq!(issued.session_id, SessionId::new(4));
    }

    #[test]
    fn test_epoch_seconds_used_without_iso() {
        let body = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at_ts": 1_700_000_180
        }));

        assert_eq!(body.expiry(), Utc.timestamp_opt(1_700_000_180, 0).single());
    }

    #[test]
    fn test_millisecond_and_iso_expiry() {
        let millis = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at_ts": 1_700_000_180_500i64
        }));
        assert_eq!(
            millis.expiry(),
            Utc.timestamp_millis_opt(1_700_000_180_500).single()
        );

        let iso = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at": "2024-03-04T08:03:00+00:00"
        }));
        assert_eq!(
            iso.expiry(),
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 3, 0).single()
        );
    }

    #[test]
    fn test_unreadable_expiry_falls_back_to_other_field() {
        let body = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at": "2024-03-04 08:03:00",
            "expires_at_ts": "soon"
        }));
        assert_eq!(body.expiry(), Utc.with_ymd_and_hms(2024, 3, 4, 8, 3, 0).single());

        let body = parse(serde_json::json!({
            "token": "ABC123",
            "expires_at": "later",
            "expires_at_ts": 1_700_000_180
        }));
        assert_eq!(body.expiry(), Utc.timestamp_opt(1_700_000_180, 0).single());
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let no_token = parse(serde_json::json!({ "expires_at_ts": 1_700_000_180 }));
        assert!(matches!(
            no_token.into_issued(SessionId::new(1)),
            Err(ClientError::InvalidResponse { .. })
        ));

        let blank_token = parse(serde_json::json!({ "token": "  ", "expires_at_ts": 1_700_000_180 }));
        assert!(matches!(
            blank_token.into_issued(SessionId::new(1)),
            Err(ClientError::InvalidResponse { .. })
        ));

        let no_expiry = parse(serde_json::json!({ "token": "ABC123" }));
        assert!(matches!(
            no_expiry.into_issued(SessionId::new(1)),
            Err(ClientError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_force_flag_serialization() {
        assert_eq!(serde_json::to_string(&IssueRequest { force: false }).unwrap(), "{}");
        assert_eq!(
            serde_json::to_string(&IssueRequest { force: true }).unwrap(),
            r#"{"force":true}"#
        );
    }

    #[test]
    fn test_issue_url_trims_trailing_slash() {
        let client = HttpIssuerClient::new("http://issuer.local/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.issue_url(SessionId::new(12)),
            "http://issuer.local/api/v1/attendance-sessions/12/token"
        );
    }
}
