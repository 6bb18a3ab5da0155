//! Unit tests for the token cleanup service

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::AttendanceToken;
use crate::domain::value_objects::SessionId;
use crate::repositories::{InMemoryTokenRepository, TokenRepository};
use crate::services::clock::ManualClock;
use crate::services::issuer::{TokenCleanupConfig, TokenCleanupService};

#[tokio::test]
async fn test_cleanup_respects_retention() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    let repo = Arc::new(InMemoryTokenRepository::new());
    let ttl = Duration::seconds(180);

    repo.save(AttendanceToken::issue(SessionId(1), "OLD".into(), now - Duration::hours(30), ttl))
        .await
        .unwrap();
    repo.save(AttendanceToken::issue(SessionId(1), "KEEP".into(), now - Duration::hours(2), ttl))
        .await
        .unwrap();

    let service = TokenCleanupService::new(
        repo.clone(),
        Arc::new(ManualClock::new(now)),
        TokenCleanupConfig::default(),
    );

    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 1);
    assert!(repo.find_by_value("OLD").await.unwrap().is_none());
    assert!(repo.find_by_value("KEEP").await.unwrap().is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_is_noop() {
    let now = Utc::now();
    let repo = Arc::new(InMemoryTokenRepository::new());
    repo.save(AttendanceToken::issue(
        SessionId(1),
        "OLD".into(),
        now - Duration::days(3),
        Duration::seconds(180),
    ))
    .await
    .unwrap();

    let service = Arc::new(TokenCleanupService::new(
        repo.clone(),
        Arc::new(ManualClock::new(now)),
        TokenCleanupConfig {
            enabled: false,
            ..Default::default()
        },
    ));

    assert_eq!(service.run_cleanup().await.unwrap().expired_tokens_deleted, 0);
    assert!(service.start_background_task().is_none());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_out_of_range_retention_deletes_nothing() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    let repo = Arc::new(InMemoryTokenRepository::new());
    repo.save(AttendanceToken::issue(
        SessionId(1),
        "OLD".into(),
        now - Duration::days(400),
        Duration::seconds(180),
    ))
    .await
    .unwrap();
    repo.save(AttendanceToken::issue(SessionId(1), "LIVE".into(), now, Duration::seconds(180)))
        .await
        .unwrap();

    for retention_hours in [i64::MAX, i64::MAX / 3_600, -1, i64::MIN] {
        let service = TokenCleanupService::new(
            repo.clone(),
            Arc::new(ManualClock::new(now)),
            TokenCleanupConfig {
                retention_hours,
                ..Default::default()
            },
        );

        let result = service.run_cleanup().await.unwrap();
        assert!(!result.is_success(), "retention {} accepted", retention_hours);
        assert_eq!(result.expired_tokens_deleted, 0);
    }

    assert!(repo.find_by_value("OLD").await.unwrap().is_some());
    assert!(repo.find_by_value("LIVE").await.unwrap().is_some());
}
