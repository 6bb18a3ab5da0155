//! Unit tests for the attendance session entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::session::AttendanceSession;
use crate::domain::value_objects::SessionId;

#[test]
fn test_new_session_is_open() {
    let now = Utc::now();
    let session = AttendanceSession::new(SessionId(1), 3).with_title("Pertemuan 3");

    assert!(session.is_open_at(now));
    assert!(!session.has_ended_at(now));
    assert_eq!(session.title.as_deref(), Some("Pertemuan 3"));
}

#[test]
fn test_inactive_session_is_closed() {
    let session = AttendanceSession::new(SessionId(1), 1).deactivated();
    assert!(!session.is_open_at(Utc::now()));
}

#[test]
fn test_session_closes_after_end_time() {
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
    let end = start + Duration::hours(2);
    let session = AttendanceSession::new(SessionId(9), 2).with_window(start, end);

    assert!(session.is_open_at(end));
    assert!(session.has_ended_at(end + Duration::seconds(1)));
    assert!(!session.is_open_at(end + Duration::seconds(1)));
}
