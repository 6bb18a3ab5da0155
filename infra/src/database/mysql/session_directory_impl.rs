//! MySQL implementation of the SessionDirectory trait.
//!
//! Reads `attendance_sessions` joined with `mata_kuliah` for the course name.
//! Lecturers manage a session when they teach its course (`dosen_course`)
//! or created it themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use qr_core::domain::entities::{AttendanceSession, Operator};
use qr_core::domain::value_objects::SessionId;
use qr_core::errors::DomainError;
use qr_core::repositories::SessionDirectory;

/// MySQL implementation of SessionDirectory
pub struct MySqlSessionDirectory {
    pool: MySqlPool,
}

impl MySqlSessionDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<AttendanceSession, DomainError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;
        let meeting_number: i64 = row
            .try_get("meeting_number")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get meeting_number: {}", e) })?;

        Ok(AttendanceSession {
            id: SessionId::new(id),
            title: row
                .try_get("title")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get title: {}", e) })?,
            meeting_number: u32::try_from(meeting_number).unwrap_or_default(),
            course_name: row
                .try_get("course_name")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get course_name: {}", e) })?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get is_active: {}", e) })?,
            start_at: row.try_get::<Option<DateTime<Utc>>, _>("start_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get start_at: {}", e) }
            })?,
            end_at: row.try_get::<Option<DateTime<Utc>>, _>("end_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get end_at: {}", e) }
            })?,
        })
    }
}

#[async_trait]
impl SessionDirectory for MySqlSessionDirectory {
    async fn find_session(&self, id: SessionId) -> Result<Option<AttendanceSession>, DomainError> {
        let query = r#"
            SELECT
                CAST(s.id AS SIGNED) AS id,
                s.title,
                CAST(COALESCE(s.meeting_number, 0) AS SIGNED) AS meeting_number,
                mk.nama AS course_name,
                s.is_active,
                s.start_at,
                s.end_at
            FROM attendance_sessions s
            LEFT JOIN mata_kuliah mk ON mk.id = s.course_id
            WHERE s.id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find session: {}", e) })?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn can_manage(&self, id: SessionId, operator: &Operator) -> Result<bool, DomainError> {
        if operator.is_admin() {
            return Ok(true);
        }

        let query = r#"
            SELECT EXISTS(
                SELECT 1
                FROM attendance_sessions s
                LEFT JOIN dosen_course dc
                    ON dc.course_id = s.course_id AND dc.dosen_id = ?
                WHERE s.id = ?
                    AND (dc.dosen_id IS NOT NULL OR s.created_by_dosen_id = ?)
            ) AS allowed
        "#;

        let row = sqlx::query(query)
            .bind(&operator.id)
            .bind(id.value())
            .bind(&operator.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to check session access: {}", e) })?;

        let allowed: i64 = row
            .try_get("allowed")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get access result: {}", e) })?;

        Ok(allowed == 1)
    }
}
