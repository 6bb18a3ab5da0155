//! Attendance session as seen by the token issuer.
//!
//! Sessions are owned by the scheduling side of the system; the issuer only
//! reads them to decide whether tokens may be issued or redeemed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SessionId;

/// A scheduled meeting that students check in to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: SessionId,
    pub title: Option<String>,
    pub meeting_number: u32,
    pub course_name: Option<String>,
    pub is_active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl AttendanceSession {
    /// Creates an active session without a schedule window
    pub fn new(id: SessionId, meeting_number: u32) -> Self {
        Self {
            id,
            title: None,
            meeting_number,
            course_name: None,
            is_active: true,
            start_at: None,
            end_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_course(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = Some(course_name.into());
        self
    }

    pub fn with_window(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Checks if the session's end time has passed at `now`
    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        self.end_at.map_or(false, |end_at| now > end_at)
    }

    /// Checks if tokens may be issued for this session at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.has_ended_at(now)
    }
}
