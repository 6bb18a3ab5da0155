//! In-memory session directory

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{AttendanceSession, Operator};
use crate::domain::value_objects::SessionId;
use crate::errors::DomainError;

use super::SessionDirectory;

/// Session directory seeded programmatically
#[derive(Clone, Default)]
pub struct InMemorySessionDirectory {
    sessions: Arc<RwLock<HashMap<SessionId, AttendanceSession>>>,
    managers: Arc<RwLock<HashMap<SessionId, HashSet<String>>>>,
}

impl InMemorySessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session
    pub async fn insert(&self, session: AttendanceSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// Assign a lecturer to a session's course
    pub async fn assign(&self, id: SessionId, operator_id: impl Into<String>) {
        self.managers
            .write()
            .await
            .entry(id)
            .or_default()
            .insert(operator_id.into());
    }

    /// Toggle the active flag of a stored session
    ///
    /// # Returns
    /// `false` when the session does not exist
    pub async fn set_active(&self, id: SessionId, is_active: bool) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(session) => {
                session.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl SessionDirectory for InMemorySessionDirectory {
    async fn find_session(&self, id: SessionId) -> Result<Option<AttendanceSession>, DomainError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn can_manage(&self, id: SessionId, operator: &Operator) -> Result<bool, DomainError> {
        if operator.is_admin() {
            return Ok(true);
        }

        Ok(self
            .managers
            .read()
            .await
            .get(&id)
            .map_or(false, |managers| managers.contains(&operator.id)))
    }
}
