//! MySQL implementation of the TokenRepository trait.
//!
//! Attendance tokens live in the `attendance_tokens` table. Validity is a
//! half-open window `[created_at, expires_at)`, so every "still valid"
//! predicate below is `created_at <= ? AND expires_at > ?`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use qr_core::domain::entities::AttendanceToken;
use qr_core::domain::value_objects::{SessionId, TokenStats};
use qr_core::errors::DomainError;
use qr_core::repositories::TokenRepository;

const TOKEN_COLUMNS: &str =
    "id, attendance_session_id, token, created_at, expires_at, scan_count";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to AttendanceToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<AttendanceToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        Ok(AttendanceToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            session_id: SessionId::new(row.try_get("attendance_session_id").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get attendance_session_id: {}", e) }
            })?),
            token: row
                .try_get("token")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get token: {}", e) })?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get created_at: {}", e) }
            })?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get expires_at: {}", e) }
            })?,
            scan_count: row
                .try_get("scan_count")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get scan_count: {}", e) })?,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM attendance_tokens WHERE id = ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find token by id: {}", e) })?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn hourly_counts(&self, now: DateTime<Utc>) -> Result<[u64; 24], DomainError> {
        let day_start = start_of_day(now);
        let query = r#"
            SELECT CAST(HOUR(created_at) AS SIGNED) AS hour, COUNT(*) AS tokens
            FROM attendance_tokens
            WHERE created_at >= ? AND created_at < ?
            GROUP BY HOUR(created_at)
        "#;

        let rows = sqlx::query(query)
            .bind(day_start)
            .bind(day_start + Duration::days(1))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to load hourly stats: {}", e) })?;

        let mut counts = [0u64; 24];
        for row in rows {
            let hour: i64 = row
                .try_get("hour")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get hour: {}", e) })?;
            let tokens: i64 = row
                .try_get("tokens")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get tokens: {}", e) })?;
            if let Some(bucket) = usize::try_from(hour).ok().and_then(|h| counts.get_mut(h)) {
                *bucket = tokens.max(0) as u64;
            }
        }

        Ok(counts)
    }
}

/// Midnight UTC of the day containing `now`
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: AttendanceToken) -> Result<AttendanceToken, DomainError> {
        let query = r#"
            INSERT INTO attendance_tokens (
                id, attendance_session_id, token, created_at, expires_at, scan_count
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.session_id.value())
            .bind(&token.token)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.scan_count)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => DomainError::Validation {
                    message: "Token already exists".to_string(),
                },
                other => DomainError::Internal {
                    message: format!("Failed to save attendance token: {}", other),
                },
            })?;

        tracing::debug!(
            session_id = %token.session_id,
            token_id = %token.id,
            "Attendance token stored"
        );

        Ok(token)
    }

    async fn find_current(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM attendance_tokens
            WHERE attendance_session_id = ?
                AND created_at <= ?
                AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(session_id.value())
            .bind(now)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find current token: {}", e) })?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_value(&self, token: &str) -> Result<Option<AttendanceToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM attendance_tokens WHERE token = ? ORDER BY created_at DESC LIMIT 1",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find token: {}", e) })?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn invalidate_active(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE attendance_tokens
            SET expires_at = ?
            WHERE attendance_session_id = ?
                AND created_at <= ?
                AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(session_id.value())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to invalidate tokens: {}", e) })?;

        Ok(result.rows_affected() as usize)
    }

    async fn record_scan(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceToken>, DomainError> {
        let query = r#"
            UPDATE attendance_tokens
            SET scan_count = scan_count + 1
            WHERE id = ?
                AND created_at <= ?
                AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to record scan: {}", e) })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn recent_for_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<AttendanceToken>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM attendance_tokens
            WHERE attendance_session_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(session_id.value())
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to load recent tokens: {}", e) })?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<TokenStats, DomainError> {
        let day_start = start_of_day(now);
        let query = r#"
            SELECT
                COUNT(*) AS total_generated,
                COALESCE(CAST(SUM(created_at >= ? AND created_at < ?) AS SIGNED), 0) AS total_today,
                COALESCE(CAST(SUM(created_at <= ? AND expires_at > ?) AS SIGNED), 0) AS active_tokens
            FROM attendance_tokens
        "#;

        let row = sqlx::query(query)
            .bind(day_start)
            .bind(day_start + Duration::days(1))
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to load token stats: {}", e) })?;

        let total: i64 = row
            .try_get("total_generated")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get total_generated: {}", e) })?;
        let today: i64 = row
            .try_get("total_today")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get total_today: {}", e) })?;
        let active: i64 = row
            .try_get("active_tokens")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get active_tokens: {}", e) })?;

        let total = total.max(0) as u64;
        let active = active.max(0) as u64;

        Ok(TokenStats {
            total_generated: total,
            total_today: today.max(0) as u64,
            active_tokens: active,
            expired_tokens: total.saturating_sub(active),
            hourly: TokenStats::hourly_buckets(&self.hourly_counts(now).await?),
        })
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM attendance_tokens
            WHERE expires_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to delete expired tokens: {}", e) })?;

        Ok(result.rows_affected() as usize)
    }
}
