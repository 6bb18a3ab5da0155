//! Read-only projections over issued tokens.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::AttendanceToken;

/// Number of tokens issued during one hour of the current day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    /// Hour label formatted as `HH:00`
    pub hour: String,
    pub tokens: u64,
}

/// Aggregate issuance statistics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenStats {
    pub total_generated: u64,
    pub total_today: u64,
    pub active_tokens: u64,
    pub expired_tokens: u64,
    /// 24 buckets for the current UTC day
    pub hourly: Vec<HourlyCount>,
}

impl TokenStats {
    /// Builds the 24 hourly buckets from per-hour counts
    pub fn hourly_buckets(counts: &[u64; 24]) -> Vec<HourlyCount> {
        counts
            .iter()
            .enumerate()
            .map(|(hour, tokens)| HourlyCount {
                hour: format!("{:02}:00", hour),
                tokens: *tokens,
            })
            .collect()
    }

    /// Computes statistics over a full set of tokens at `now`
    pub fn from_tokens<'a, I>(tokens: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceToken>,
    {
        let today = now.date_naive();
        let mut stats = TokenStats::default();
        let mut counts = [0u64; 24];

        for token in tokens {
            stats.total_generated += 1;
            if token.is_valid_at(now) {
                stats.active_tokens += 1;
            } else {
                stats.expired_tokens += 1;
            }
            if token.created_at.date_naive() == today {
                stats.total_today += 1;
                counts[token.created_at.hour() as usize] += 1;
            }
        }

        stats.hourly = Self::hourly_buckets(&counts);
        stats
    }
}

/// One row of a session's recent token history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_expired: bool,
    pub scan_count: u32,
}

impl TokenSummary {
    pub fn from_token(token: &AttendanceToken, now: DateTime<Utc>) -> Self {
        Self {
            id: token.id,
            token: token.token.clone(),
            created_at: token.created_at,
            expires_at: token.expires_at,
            is_expired: token.is_expired_at(now),
            scan_count: token.scan_count,
        }
    }
}
