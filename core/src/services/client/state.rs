//! Observable state of the display client.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{remaining_seconds, IssuedToken, SessionId};

use super::boundary::RenderedQr;

/// Lifecycle phase of the bound session's token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No token held
    #[default]
    Idle,
    /// First request for the bound session is in flight
    Requesting,
    /// A token is shown and a rotation is scheduled
    Displaying,
    /// A replacement request is in flight while the old token stays visible
    Rotating,
}

/// Outcome of the most recent request, shown next to the QR code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClientStatus {
    #[default]
    Ready,
    RequestFailed { message: String },
    Unauthorized,
    NoActiveSession,
}

/// Token currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldToken {
    pub issued: IssuedToken,
    /// `None` when rendering failed
    pub qr: Option<RenderedQr>,
}

impl HeldToken {
    pub fn value(&self) -> &str {
        &self.issued.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued.expires_at
    }
}

/// What the screen should show at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    NoSession,
    NoToken,
    Valid { remaining_seconds: u64 },
    /// Countdown reached zero and the replacement has not arrived yet
    ExpiredAwaitingRegeneration,
}

/// Point-in-time copy of the client state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientSnapshot {
    pub session_id: Option<SessionId>,
    pub phase: Phase,
    pub token: Option<HeldToken>,
    pub status: ClientStatus,
    pub in_flight: bool,
    /// A user-triggered request is in flight; scheduled rotations stay silent
    pub loading: bool,
}

impl ClientSnapshot {
    /// Countdown value at `now`, `None` without a token
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> Option<u64> {
        self.token
            .as_ref()
            .map(|held| remaining_seconds(held.expires_at(), now))
    }

    pub fn display_state_at(&self, now: DateTime<Utc>) -> DisplayState {
        if self.session_id.is_none() {
            return DisplayState::NoSession;
        }
        match self.remaining_seconds_at(now) {
            None => DisplayState::NoToken,
            Some(0) => DisplayState::ExpiredAwaitingRegeneration,
            Some(remaining_seconds) => DisplayState::Valid { remaining_seconds },
        }
    }
}
