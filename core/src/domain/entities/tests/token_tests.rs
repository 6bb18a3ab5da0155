//! Unit tests for the attendance token entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::token::{AttendanceToken, DEFAULT_TOKEN_TTL_SECONDS};
use crate::domain::value_objects::SessionId;

fn issued_token() -> AttendanceToken {
    let issued_at = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
    AttendanceToken::issue(
        SessionId(7),
        "ABC123DEF456GHI789JK".to_string(),
        issued_at,
        Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
    )
}

#[test]
fn test_issue_sets_expiry_from_ttl() {
    let token = issued_token();

    assert_eq!(token.session_id, SessionId(7));
    assert_eq!(token.scan_count, 0);
    assert_eq!(token.ttl(), Duration::seconds(180));
    assert_eq!(token.expires_at - token.created_at, Duration::seconds(180));
}

#[test]
fn test_validity_window_is_half_open() {
    let token = issued_token();

    assert!(token.is_valid_at(token.created_at));
    assert!(token.is_valid_at(token.expires_at - Duration::milliseconds(1)));
    assert!(!token.is_valid_at(token.expires_at));
    assert!(token.is_expired_at(token.expires_at));
    assert!(!token.is_valid_at(token.created_at - Duration::seconds(1)));
}

#[test]
fn test_remaining_seconds_rounds_up() {
    let token = issued_token();

    assert_eq!(token.remaining_seconds_at(token.created_at), 180);
    assert_eq!(
        token.remaining_seconds_at(token.created_at + Duration::seconds(179)),
        1
    );
    assert_eq!(
        token.remaining_seconds_at(token.created_at + Duration::milliseconds(179_001)),
        1
    );
    assert_eq!(token.remaining_seconds_at(token.expires_at), 0);
    assert_eq!(
        token.remaining_seconds_at(token.expires_at + Duration::seconds(30)),
        0
    );
}

#[test]
fn test_invalidate_ends_validity_immediately() {
    let mut token = issued_token();
    let now = token.created_at + Duration::seconds(42);

    token.invalidate_at(now);

    assert_eq!(token.expires_at, now);
    assert!(token.is_expired_at(now));
}

#[test]
fn test_invalidate_keeps_earlier_expiry() {
    let mut token = issued_token();
    let original_expiry = token.expires_at;

    token.invalidate_at(original_expiry + Duration::minutes(5));

    assert_eq!(token.expires_at, original_expiry);
}

#[test]
fn test_record_scan_increments_count() {
    let mut token = issued_token();
    token.record_scan();
    token.record_scan();
    assert_eq!(token.scan_count, 2);
}
