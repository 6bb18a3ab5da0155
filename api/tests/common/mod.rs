//! Shared fixtures for the API integration tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use qr_api::middleware::Claims;
use qr_api::AppState;
use qr_core::domain::entities::AttendanceSession;
use qr_core::domain::value_objects::SessionId;
use qr_core::repositories::{InMemorySessionDirectory, InMemoryTokenRepository};
use qr_core::services::{Clock, IssuerConfig, ManualClock, TokenIssuerService};
use qr_shared::JwtConfig;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const LECTURER_ID: &str = "dosen-7";
pub const OPEN_SESSION: i64 = 12;
pub const INACTIVE_SESSION: i64 = 13;
pub const ENDED_SESSION: i64 = 14;

pub type TestState = AppState<InMemoryTokenRepository, InMemorySessionDirectory>;

/// Issuer wired to in-memory storage and a manual clock
pub struct TestContext {
    pub state: web::Data<TestState>,
    pub sessions: Arc<InMemorySessionDirectory>,
    pub tokens: Arc<InMemoryTokenRepository>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub async fn new() -> Self {
        let sessions = Arc::new(InMemorySessionDirectory::new());
        let tokens = Arc::new(InMemoryTokenRepository::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let now = clock.now();

        sessions
            .insert(AttendanceSession::new(SessionId::new(OPEN_SESSION), 3).with_course("Basis Data"))
            .await;
        sessions
            .insert(AttendanceSession::new(SessionId::new(INACTIVE_SESSION), 4).deactivated())
            .await;
        sessions
            .insert(
                AttendanceSession::new(SessionId::new(ENDED_SESSION), 5)
                    .with_window(now - Duration::hours(2), now + Duration::minutes(1)),
            )
            .await;
        for id in [OPEN_SESSION, INACTIVE_SESSION, ENDED_SESSION] {
            sessions.assign(SessionId::new(id), LECTURER_ID).await;
        }

        let issuer = Arc::new(TokenIssuerService::new(
            Arc::clone(&tokens),
            Arc::clone(&sessions),
            clock.clone() as Arc<dyn Clock>,
            IssuerConfig::default(),
        ));

        Self {
            state: web::Data::new(AppState::new(issuer, "memory")),
            sessions,
            tokens,
            clock,
        }
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

/// Signs an HS256 bearer token for the given caller
pub fn sign(sub: &str, role: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
        iss: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(sub: &str, role: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", sign(sub, role)))
}

pub fn lecturer() -> (&'static str, String) {
    bearer(LECTURER_ID, "dosen")
}

pub fn admin() -> (&'static str, String) {
    bearer("admin-1", "admin")
}

pub fn student() -> (&'static str, String) {
    bearer("2201001", "mahasiswa")
}
