//! Terminal display for a session's rotating attendance QR code.
//!
//! Binds a [`TokenClient`] to one session on a remote issuer and redraws the
//! QR code whenever the token rotates. Type `r` + Enter to force a new token,
//! `q` + Enter to quit.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qr_core::domain::value_objects::SessionId;
use qr_core::services::{
    ClientSnapshot, ClientStatus, RotationOutcome, SystemClock, TokenClient, TokenClientContext,
};
use qr_infra::{HttpIssuerClient, TerminalQrRenderer};
use qr_shared::duration::{format_countdown, format_ttl};
use qr_shared::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "qr-display", version, about = "Show a session's rotating attendance QR code")]
struct Args {
    /// Base URL of the issuer API
    #[arg(long, env = "ISSUER_BASE_URL")]
    server: Option<String>,

    /// Attendance session to display
    #[arg(long, env = "ATTENDANCE_SESSION_ID")]
    session: i64,

    /// Bearer token of a lecturer or admin
    #[arg(long, env = "ISSUER_BEARER_TOKEN")]
    bearer: Option<String>,

    /// Invalidate the current token on start instead of reusing it
    #[arg(long)]
    force_first: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(server) = args.server {
        config.issuer_base_url = server;
    }

    let issuer = HttpIssuerClient::from_config(&config, args.bearer)
        .context("failed to build issuer HTTP client")?;
    let client = TokenClient::new(TokenClientContext {
        issuer: Arc::new(issuer),
        renderer: Arc::new(TerminalQrRenderer::new()),
        clock: Arc::new(SystemClock),
        config: config.with_auto_generate(false),
    });

    let session_id = SessionId::new(args.session);
    info!(session_id = %session_id, "Starting display");

    let mut snapshots = client.subscribe();
    let mut countdown = client.spawn_countdown();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    client.bind(session_id).await;
    let first = if args.force_first {
        client.force_regenerate().await
    } else {
        client.generate().await
    };
    report(&first);

    let mut shown = show(&client.snapshot(), None);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                shown = show(&snapshot, shown);
            }
            changed = countdown.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(remaining) = *countdown.borrow_and_update() {
                    eprint!("\rSisa waktu: {:<8}", format_countdown(remaining));
                }
            }
            line = stdin.next_line() => {
                match line {
                    Ok(Some(line)) => match line.trim() {
                        "r" => {
                            let client = client.clone();
                            tokio::spawn(async move {
                                report(&client.force_regenerate().await);
                            });
                        }
                        "q" => break,
                        _ => {}
                    },
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        }
    }

    client.shutdown();
    Ok(())
}

/// Redraws the QR code when the held token changed; returns the token on screen
fn show(snapshot: &ClientSnapshot, shown: Option<String>) -> Option<String> {
    match &snapshot.status {
        ClientStatus::Ready => {}
        ClientStatus::RequestFailed { message } => eprintln!("\nGagal meminta token: {}", message),
        ClientStatus::Unauthorized => eprintln!("\nTidak diizinkan mengelola sesi ini"),
        ClientStatus::NoActiveSession => eprintln!("\nSesi tidak aktif atau sudah berakhir"),
    }

    let Some(held) = &snapshot.token else {
        return None;
    };
    if shown.as_deref() == Some(held.value()) {
        return shown;
    }

    // Clear screen and move the cursor home
    print!("\x1B[2J\x1B[H");
    match &held.qr {
        Some(qr) => println!("{}", qr.body),
        None => println!("(QR tidak dapat ditampilkan)"),
    }

    let ttl = (held.expires_at() - Utc::now()).num_seconds();
    println!("Token: {}  (berlaku {})", held.value(), format_ttl(ttl));
    println!("[r] token baru  [q] keluar");

    Some(held.value().to_string())
}

fn report(outcome: &RotationOutcome) {
    match outcome {
        RotationOutcome::Failed(e) => warn!("Token request failed: {}", e),
        RotationOutcome::Coalesced => info!("Request already in flight"),
        other => info!(?other, "Token request finished"),
    }
}
