//! Integration tests for the issue → display → redeem flow

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use qr_core::domain::entities::{AttendanceSession, Operator};
    use qr_core::domain::value_objects::SessionId;
    use qr_core::errors::{DomainError, TokenError};
    use qr_core::repositories::{InMemorySessionDirectory, InMemoryTokenRepository};
    use qr_core::services::client::{
        LocalIssuerClient, QrFormat, QrRenderer, RenderError, RenderedQr, RotationOutcome,
        TokenClient, TokenClientContext,
    };
    use qr_core::services::clock::TokioClock;
    use qr_core::services::issuer::{IssuerConfig, TokenIssuerService};
    use qr_shared::ClientConfig;

    type Issuer = TokenIssuerService<InMemoryTokenRepository, InMemorySessionDirectory>;

    #[derive(Default)]
    struct PlainRenderer {
        shown: Mutex<Vec<String>>,
    }

    impl QrRenderer for PlainRenderer {
        fn render(&self, payload: &str) -> Result<RenderedQr, RenderError> {
            self.shown.lock().unwrap().push(payload.to_string());
            Ok(RenderedQr {
                payload: payload.to_string(),
                format: QrFormat::Text,
                body: payload.to_string(),
            })
        }
    }

    async fn setup() -> (Arc<Issuer>, TokenClient, Arc<PlainRenderer>) {
        let clock = Arc::new(TokioClock::new());
        let sessions = Arc::new(InMemorySessionDirectory::new());
        sessions
            .insert(
                AttendanceSession::new(SessionId(11), 4)
                    .with_title("Pertemuan 4")
                    .with_course("Pemrograman Sistem"),
            )
            .await;
        sessions.assign(SessionId(11), "dosen-3").await;

        let issuer = Arc::new(TokenIssuerService::new(
            Arc::new(InMemoryTokenRepository::new()),
            sessions,
            clock.clone(),
            IssuerConfig::default(),
        ));
        let renderer = Arc::new(PlainRenderer::default());

        let client = TokenClient::new(TokenClientContext {
            issuer: Arc::new(LocalIssuerClient::new(
                issuer.clone(),
                Operator::lecturer("dosen-3"),
            )),
            renderer: renderer.clone(),
            clock,
            config: ClientConfig::default().with_auto_generate(true),
        });

        (issuer, client, renderer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_displayed_token_can_be_redeemed() {
        let (issuer, client, _) = setup().await;

        assert_eq!(
            client.bind(SessionId(11)).await,
            Some(RotationOutcome::Committed)
        );
        let shown = client.snapshot().token.unwrap();

        let first = issuer.redeem(shown.value()).await.unwrap();
        let second = issuer.redeem(shown.value()).await.unwrap();

        assert_eq!(first.session_id, SessionId(11));
        assert_eq!(second.scan_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_regenerate_retires_displayed_token() {
        let (issuer, client, renderer) = setup().await;
        client.bind(SessionId(11)).await;
        let old = client.snapshot().token.unwrap();

        assert_eq!(client.force_regenerate().await, RotationOutcome::Committed);
        let new = client.snapshot().token.unwrap();

        assert!(matches!(
            issuer.redeem(old.value()).await,
            Err(DomainError::Token(TokenError::TokenInvalid))
        ));
        assert!(issuer.redeem(new.value()).await.is_ok());
        assert_eq!(
            *renderer.shown.lock().unwrap(),
            vec![old.value().to_string(), new.value().to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_keeps_one_redeemable_token() {
        let (issuer, client, _) = setup().await;
        client.bind(SessionId(11)).await;
        let first = client.snapshot().token.unwrap();

        tokio::time::sleep(Duration::from_millis(180_500)).await;
        let second = client.snapshot().token.unwrap();

        assert_ne!(first.value(), second.value());
        assert!(issuer.redeem(first.value()).await.is_err());
        assert!(issuer.redeem(second.value()).await.is_ok());

        let stats = issuer.stats().await.unwrap();
        assert_eq!(stats.total_generated, 2);
        assert_eq!(stats.active_tokens, 1);

        let recent = issuer
            .recent_tokens(SessionId(11), &Operator::admin("admin"), None)
            .await
            .unwrap();
        assert_eq!(recent[0].token, second.value());
        assert_eq!(recent[0].scan_count, 1);
        assert!(recent[1].is_expired);
    }
}
