//! Read-only access to attendance sessions and their managers.

use async_trait::async_trait;

use crate::domain::entities::{AttendanceSession, Operator};
use crate::domain::value_objects::SessionId;
use crate::errors::DomainError;

/// Lookup of sessions owned by the scheduling side of the system
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Find a session by id
    ///
    /// # Returns
    /// * `Ok(Some(AttendanceSession))` - Session found
    /// * `Ok(None)` - No session with the given id
    async fn find_session(&self, id: SessionId) -> Result<Option<AttendanceSession>, DomainError>;

    /// Check whether an operator may issue and inspect tokens for a session
    ///
    /// Admins manage every session; lecturers manage sessions of courses
    /// they are assigned to.
    async fn can_manage(&self, id: SessionId, operator: &Operator) -> Result<bool, DomainError>;
}
