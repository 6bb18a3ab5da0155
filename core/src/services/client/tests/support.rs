//! Scripted collaborators for display client tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use qr_shared::ClientConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::domain::value_objects::{IssuedToken, SessionId};
use crate::services::client::{
    ClientError, IssuerClient, QrFormat, QrRenderer, RenderError, RenderedQr, TokenClient,
    TokenClientContext,
};
use crate::services::clock::{Clock, TokioClock};

/// One scripted issuer response
pub enum Step {
    /// Token for the requested session expiring one TTL from now
    Token(&'static str),
    /// Token with a fixed expiry
    TokenAt(&'static str, DateTime<Utc>),
    /// Token attributed to another session
    ForSession(SessionId, &'static str),
    Fail(ClientError),
}

/// Issuer answering from a script, optionally held back by a gate
pub struct ScriptedIssuer {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<(SessionId, bool)>>,
    gate: Option<Semaphore>,
}

impl ScriptedIssuer {
    pub fn new(clock: Arc<dyn Clock>, steps: Vec<Step>) -> Self {
        Self {
            clock,
            ttl: Duration::seconds(180),
            script: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Requests block until `release` is called
    pub fn gated(clock: Arc<dyn Clock>, steps: Vec<Step>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(clock, steps)
        }
    }

    pub fn release(&self, responses: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(responses);
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(SessionId, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssuerClient for ScriptedIssuer {
    async fn request_token(
        &self,
        session_id: SessionId,
        force: bool,
    ) -> Result<IssuedToken, ClientError> {
        self.requests.lock().unwrap().push((session_id, force));

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let step = self.script.lock().unwrap().pop_front();
        let now = self.clock.now();
        match step {
            Some(Step::Token(value)) => Ok(IssuedToken::new(session_id, value, now + self.ttl)),
            Some(Step::TokenAt(value, expires_at)) => {
                Ok(IssuedToken::new(session_id, value, expires_at))
            }
            Some(Step::ForSession(other, value)) => {
                Ok(IssuedToken::new(other, value, now + self.ttl))
            }
            Some(Step::Fail(err)) => Err(err),
            None => {
                let n = self.calls();
                Ok(IssuedToken::new(session_id, format!("TOKEN{}", n), now + self.ttl))
            }
        }
    }
}

/// Renderer recording every payload it was asked to draw
#[derive(Default)]
pub struct RecordingRenderer {
    rendered: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl QrRenderer for RecordingRenderer {
    fn render(&self, payload: &str) -> Result<RenderedQr, RenderError> {
        self.rendered.lock().unwrap().push(payload.to_string());
        if self.fail {
            return Err(RenderError {
                message: "renderer offline".to_string(),
            });
        }
        Ok(RenderedQr {
            payload: payload.to_string(),
            format: QrFormat::Text,
            body: format!("[{}]", payload),
        })
    }
}

pub struct Harness {
    pub client: TokenClient,
    pub issuer: Arc<ScriptedIssuer>,
    pub renderer: Arc<RecordingRenderer>,
    pub clock: Arc<TokioClock>,
}

pub fn harness(steps: Vec<Step>) -> Harness {
    build(steps, false, RecordingRenderer::default(), ClientConfig::default())
}

pub fn gated_harness(steps: Vec<Step>) -> Harness {
    build(steps, true, RecordingRenderer::default(), ClientConfig::default())
}

pub fn build(
    steps: Vec<Step>,
    gated: bool,
    renderer: RecordingRenderer,
    config: ClientConfig,
) -> Harness {
    let clock = Arc::new(TokioClock::new());
    let issuer = Arc::new(if gated {
        ScriptedIssuer::gated(clock.clone(), steps)
    } else {
        ScriptedIssuer::new(clock.clone(), steps)
    });
    let renderer = Arc::new(renderer);

    let client = TokenClient::new(TokenClientContext {
        issuer: issuer.clone(),
        renderer: renderer.clone(),
        clock: clock.clone(),
        config,
    });

    Harness {
        client,
        issuer,
        renderer,
        clock,
    }
}
