//! Token as held by a display client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::AttendanceToken;
use crate::domain::value_objects::SessionId;

/// Token value and expiry returned by an issuance request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub session_id: SessionId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn new(session_id: SessionId, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            token: token.into(),
            expires_at,
        }
    }

    /// Checks whether another issuance carries the same value and expiry
    pub fn same_as(&self, other: &IssuedToken) -> bool {
        self.token == other.token && self.expires_at == other.expires_at
    }
}

impl From<&AttendanceToken> for IssuedToken {
    fn from(token: &AttendanceToken) -> Self {
        Self {
            session_id: token.session_id,
            token: token.token.clone(),
            expires_at: token.expires_at,
        }
    }
}
