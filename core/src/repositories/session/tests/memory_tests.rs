//! Unit tests for the in-memory session directory

use crate::domain::entities::{AttendanceSession, Operator};
use crate::domain::value_objects::SessionId;
use crate::repositories::session::{InMemorySessionDirectory, SessionDirectory};

#[tokio::test]
async fn test_find_session() {
    let directory = InMemorySessionDirectory::new();
    directory
        .insert(AttendanceSession::new(SessionId(5), 1).with_course("Basis Data"))
        .await;

    let found = directory.find_session(SessionId(5)).await.unwrap().unwrap();
    assert_eq!(found.course_name.as_deref(), Some("Basis Data"));
    assert!(directory.find_session(SessionId(6)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_admin_manages_everything() {
    let directory = InMemorySessionDirectory::new();
    let admin = Operator::admin("1");

    assert!(directory.can_manage(SessionId(99), &admin).await.unwrap());
}

#[tokio::test]
async fn test_lecturer_needs_assignment() {
    let directory = InMemorySessionDirectory::new();
    directory.insert(AttendanceSession::new(SessionId(5), 1)).await;
    directory.assign(SessionId(5), "dosen-7").await;

    assert!(directory
        .can_manage(SessionId(5), &Operator::lecturer("dosen-7"))
        .await
        .unwrap());
    assert!(!directory
        .can_manage(SessionId(5), &Operator::lecturer("dosen-8"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_set_active() {
    let directory = InMemorySessionDirectory::new();
    directory.insert(AttendanceSession::new(SessionId(5), 1)).await;

    assert!(directory.set_active(SessionId(5), false).await);
    assert!(!directory.find_session(SessionId(5)).await.unwrap().unwrap().is_active);
    assert!(!directory.set_active(SessionId(6), false).await);
}
