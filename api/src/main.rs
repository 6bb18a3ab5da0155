use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qr_api::{create_app, AppState};
use qr_core::domain::entities::AttendanceSession;
use qr_core::domain::value_objects::SessionId;
use qr_core::repositories::{
    InMemorySessionDirectory, InMemoryTokenRepository, SessionDirectory, TokenRepository,
};
use qr_core::services::{
    Clock, IssuerConfig, SystemClock, TokenCleanupConfig, TokenCleanupService, TokenIssuerService,
};
use qr_infra::database::{DatabasePool, MySqlSessionDirectory, MySqlTokenRepository};
use qr_shared::config::LogFormat;
use qr_shared::{AppConfig, LoggingConfig};

/// Session seeded into in-memory storage in development
const DEMO_SESSION_ID: i64 = 1;
const DEMO_OPERATOR_ID: &str = "dosen-demo";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    info!(
        "Starting Presensi QR API Server ({} environment)",
        config.environment
    );

    if config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; bearer tokens are verified with the development secret");
    }

    match config.database.clone() {
        Some(database) => {
            let pool = DatabasePool::new(database)
                .await
                .context("failed to connect to MySQL")?;
            pool.run_migrations()
                .await
                .context("failed to prepare attendance_tokens table")?;
            info!("{}", pool.get_statistics());

            let tokens = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));
            let sessions = Arc::new(MySqlSessionDirectory::new(pool.get_pool().clone()));
            let result = serve(config, tokens, sessions, "mysql").await;
            pool.close().await;
            result
        }
        None => {
            warn!("DATABASE_URL is not set; tokens are kept in memory and lost on restart");

            let tokens = Arc::new(InMemoryTokenRepository::new());
            let sessions = Arc::new(InMemorySessionDirectory::new());
            if config.environment.is_development() {
                seed_demo_session(&sessions).await;
            }
            serve(config, tokens, sessions, "memory").await
        }
    }
}

/// Wires the issuer and the cleanup task, then runs the HTTP server
async fn serve<R, S>(
    config: AppConfig,
    tokens: Arc<R>,
    sessions: Arc<S>,
    storage: &str,
) -> anyhow::Result<()>
where
    R: TokenRepository + 'static,
    S: SessionDirectory + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let issuer = Arc::new(TokenIssuerService::new(
        Arc::clone(&tokens),
        sessions,
        Arc::clone(&clock),
        IssuerConfig::from(&config.attendance),
    ));

    let cleanup = Arc::new(TokenCleanupService::new(
        tokens,
        clock,
        TokenCleanupConfig::from(&config.attendance),
    ));
    let cleanup_handle = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(issuer, storage));
    let jwt = config.jwt.clone();
    let environment = config.environment;
    let bind_address = config.server.bind_address();

    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), jwt.clone(), environment))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }

    result.context("HTTP server terminated with an error")
}

async fn seed_demo_session(sessions: &InMemorySessionDirectory) {
    let id = SessionId::new(DEMO_SESSION_ID);
    sessions
        .insert(
            AttendanceSession::new(id, 1)
                .with_title("Pertemuan 1")
                .with_course("Demo Course"),
        )
        .await;
    sessions.assign(id, DEMO_OPERATOR_ID).await;

    info!(
        "Seeded demo session {} managed by '{}'",
        DEMO_SESSION_ID, DEMO_OPERATOR_ID
    );
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.colored)
        .with_target(true);

    match logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
