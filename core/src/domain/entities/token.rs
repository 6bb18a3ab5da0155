//! Attendance token entity issued for a session and displayed as a QR code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{remaining_seconds, SessionId};

/// Default token lifetime (3 minutes)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 180;

/// Default number of characters in a token value
pub const DEFAULT_TOKEN_LENGTH: usize = 20;

/// Characters a token value is drawn from
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short-lived attendance credential bound to one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceToken {
    /// Unique identifier for the token row
    pub id: Uuid,

    /// Session this token was issued for
    pub session_id: SessionId,

    /// Opaque token value encoded in the QR code
    pub token: String,

    /// Issuance instant
    pub created_at: DateTime<Utc>,

    /// Instant at which the token stops being valid
    pub expires_at: DateTime<Utc>,

    /// Number of successful redemptions
    pub scan_count: u32,
}

impl AttendanceToken {
    /// Creates a token issued at `issued_at` that lives for `ttl`
    ///
    /// # Arguments
    ///
    /// * `session_id` - The session the token belongs to
    /// * `token` - The generated token value
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Token lifetime
    pub fn issue(
        session_id: SessionId,
        token: String,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            token,
            created_at: issued_at,
            expires_at: issued_at + ttl,
            scan_count: 0,
        }
    }

    /// Checks if the token has expired at `now`
    ///
    /// A token is expired from `expires_at` onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks if `now` falls inside the `[created_at, expires_at)` window
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.created_at && now < self.expires_at
    }

    /// Whole seconds left before expiry, rounded up and clamped at zero
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        remaining_seconds(self.expires_at, now)
    }

    /// Configured lifetime of the token
    pub fn ttl(&self) -> Duration {
        self.expires_at - self.created_at
    }

    /// Ends the validity of a still-valid token at `now`
    ///
    /// Tokens that already expired keep their original expiry.
    pub fn invalidate_at(&mut self, now: DateTime<Utc>) {
        if self.expires_at > now {
            self.expires_at = now;
        }
    }

    /// Records one redemption
    pub fn record_scan(&mut self) {
        self.scan_count = self.scan_count.saturating_add(1);
    }
}
