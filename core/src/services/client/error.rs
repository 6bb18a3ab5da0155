//! Errors observed by the display client

use thiserror::Error;

/// Failure of a single issuance request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Token request failed: {message}")]
    RequestFailed { status: Option<u16>, message: String },

    #[error("Not allowed to manage this session")]
    Unauthorized,

    #[error("Session is not open for attendance")]
    NoActiveSession,

    #[error("Response belongs to a session that is no longer bound")]
    StaleResponse,

    #[error("Malformed issuer response: {message}")]
    InvalidResponse { message: String },
}

impl ClientError {
    /// Classify a non-success HTTP status returned by the issuer
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized,
            404 | 409 | 422 => ClientError::NoActiveSession,
            _ => ClientError::RequestFailed {
                status: Some(status),
                message: message.into(),
            },
        }
    }

    /// Transport-level failure without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::RequestFailed {
            status: None,
            message: message.into(),
        }
    }
}
