//! Expiry instants as they appear on the wire.
//!
//! Issuers report expiry as epoch seconds, epoch milliseconds or an ISO-8601
//! string. Everything is normalised to `DateTime<Utc>` at the boundary.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Numeric values at or above this are epoch milliseconds (year 5138 in seconds)
pub const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Any accepted wire representation of an expiry instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    Epoch(i64),
    Fractional(f64),
    Text(String),
}

impl Expiry {
    /// Converts to an instant, or `None` when the value is not a usable time
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Expiry::Epoch(value) => instant_from_epoch(*value),
            Expiry::Fractional(value) if value.is_finite() => {
                if value.abs() >= EPOCH_MILLIS_THRESHOLD as f64 {
                    Utc.timestamp_millis_opt(value.round() as i64).single()
                } else {
                    Utc.timestamp_millis_opt((value * 1000.0).round() as i64).single()
                }
            }
            Expiry::Fractional(_) => None,
            Expiry::Text(text) => parse_expiry(text),
        }
    }
}

/// Interprets an epoch number as seconds or milliseconds
pub fn instant_from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

/// Parses an ISO-8601 timestamp or a numeric epoch string
pub fn parse_expiry(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Naive timestamps are taken as UTC
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    text.parse::<i64>().ok().and_then(instant_from_epoch)
}

/// Whole seconds from `now` until `expires_at`, rounded up and clamped at zero
pub fn remaining_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (expires_at - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 999) / 1000) as u64
    }
}
