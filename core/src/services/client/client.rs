//! Display client state machine
//!
//! One `TokenClient` drives one screen. All state lives behind a single
//! `std::sync::Mutex` that is never held across an `.await`; every response
//! is checked against the binding epoch before it may touch the state.

use chrono::{DateTime, Utc};
use qr_shared::ClientConfig;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::value_objects::{remaining_seconds, IssuedToken, SessionId};
use crate::services::clock::Clock;

use super::boundary::{IssuerClient, QrRenderer, RenderedQr};
use super::error::ClientError;
use super::state::{ClientSnapshot, ClientStatus, DisplayState, HeldToken, Phase};

/// Collaborators and settings a client is built from
pub struct TokenClientContext {
    pub issuer: Arc<dyn IssuerClient>,
    pub renderer: Arc<dyn QrRenderer>,
    pub clock: Arc<dyn Clock>,
    pub config: ClientConfig,
}

/// What caused a rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationTrigger {
    /// "Generate" pressed
    Manual,
    /// "Force regenerate" pressed
    Forced,
    /// Rotation timer fired after expiry
    Scheduled,
    /// A session was bound with auto-generate enabled
    Bind,
}

impl RotationTrigger {
    pub fn is_forced(self) -> bool {
        matches!(self, RotationTrigger::Forced)
    }

    /// Scheduled rotations do not show a loading indicator
    pub fn is_silent(self) -> bool {
        matches!(self, RotationTrigger::Scheduled)
    }
}

/// Result of one rotation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// A new token is on screen
    Committed,
    /// The issuer returned the token already on screen
    Unchanged,
    /// Another request was already in flight; this trigger was dropped
    Coalesced,
    /// No session is bound
    NoSession,
    /// The response no longer matched the bound session
    Discarded,
    /// The request failed; the previous token stays on screen
    Failed(ClientError),
}

/// Cloneable handle to a rotating token display
///
/// Dropping the last handle cancels the pending rotation timer.
#[derive(Clone)]
pub struct TokenClient {
    shared: Arc<Shared>,
}

struct Shared {
    issuer: Arc<dyn IssuerClient>,
    renderer: Arc<dyn QrRenderer>,
    clock: Arc<dyn Clock>,
    grace: Duration,
    tick: Duration,
    auto_generate: bool,
    state: Mutex<ClientState>,
    snapshot_tx: watch::Sender<ClientSnapshot>,
}

struct RotationTimer {
    seq: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct ClientState {
    session_id: Option<SessionId>,
    /// Bumped on every bind, unbind and shutdown
    epoch: u64,
    phase: Phase,
    token: Option<HeldToken>,
    status: ClientStatus,
    in_flight: bool,
    loading: bool,
    timer: Option<RotationTimer>,
    timer_seq: u64,
    closed: bool,
}

impl ClientState {
    fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            session_id: self.session_id,
            phase: self.phase,
            token: self.token.clone(),
            status: self.status.clone(),
            in_flight: self.in_flight,
            loading: self.loading,
        }
    }

    fn settled_phase(&self) -> Phase {
        if self.token.is_some() {
            Phase::Displaying
        } else {
            Phase::Idle
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
        }
    }

    fn rebind(&mut self, session_id: Option<SessionId>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.session_id = session_id;
        self.cancel_timer();
        self.token = None;
        self.phase = Phase::Idle;
        self.status = ClientStatus::Ready;
        self.in_flight = false;
        self.loading = false;
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &ClientState) {
        self.snapshot_tx.send_replace(state.snapshot());
    }

    fn remaining_seconds(&self) -> Option<u64> {
        let now = self.clock.now();
        self.lock_state()
            .token
            .as_ref()
            .map(|held| remaining_seconds(held.expires_at(), now))
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        state.cancel_timer();
    }
}

/// Clears the in-flight flag when a request future is dropped before commit
struct InFlightGuard<'a> {
    shared: &'a Shared,
    epoch: u64,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(shared: &'a Shared, epoch: u64) -> Self {
        Self {
            shared,
            epoch,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = self.shared.lock_state();
        if state.epoch == self.epoch && state.in_flight {
            debug!("Token request cancelled before completion");
            state.in_flight = false;
            state.loading = false;
            state.phase = state.settled_phase();
            self.shared.publish(&state);
        }
    }
}

impl TokenClient {
    /// Creates an idle client with no session bound
    pub fn new(context: TokenClientContext) -> Self {
        let (snapshot_tx, _) = watch::channel(ClientSnapshot::default());

        Self {
            shared: Arc::new(Shared {
                issuer: context.issuer,
                renderer: context.renderer,
                clock: context.clock,
                grace: context.config.rotation_grace(),
                tick: context.config.countdown_tick(),
                auto_generate: context.config.auto_generate_on_bind,
                state: Mutex::new(ClientState::default()),
                snapshot_tx,
            }),
        }
    }

    /// Binds the client to a session
    ///
    /// Switching sessions clears the held token, cancels the pending rotation
    /// and orphans any in-flight request. Rebinding the current session is a
    /// no-op. When auto-generate is enabled a token is requested right away.
    pub async fn bind(&self, session_id: SessionId) -> Option<RotationOutcome> {
        {
            let mut state = self.shared.lock_state();
            if state.closed || state.session_id == Some(session_id) {
                return None;
            }

            debug!(
                session_id = %session_id,
                previous = ?state.session_id,
                "Binding display to session"
            );
            state.rebind(Some(session_id));
            self.shared.publish(&state);
        }

        if self.shared.auto_generate {
            Some(self.rotate(RotationTrigger::Bind).await)
        } else {
            None
        }
    }

    /// Unbinds the current session and returns to idle
    pub fn unbind(&self) {
        let mut state = self.shared.lock_state();
        if state.session_id.is_none() {
            return;
        }

        debug!(session_id = ?state.session_id, "Unbinding display");
        state.rebind(None);
        self.shared.publish(&state);
    }

    /// Requests the session's current token
    pub async fn generate(&self) -> RotationOutcome {
        self.rotate(RotationTrigger::Manual).await
    }

    /// Invalidates the current token and requests a new one
    pub async fn force_regenerate(&self) -> RotationOutcome {
        self.rotate(RotationTrigger::Forced).await
    }

    /// Runs one rotation attempt
    ///
    /// At most one request is in flight per client; triggers arriving while
    /// one is pending return [`RotationOutcome::Coalesced`].
    pub async fn rotate(&self, trigger: RotationTrigger) -> RotationOutcome {
        let (session_id, epoch) = {
            let mut state = self.shared.lock_state();
            let Some(session_id) = state.session_id else {
                return RotationOutcome::NoSession;
            };
            if state.in_flight {
                debug!(session_id = %session_id, ?trigger, "Request already in flight, dropping trigger");
                return RotationOutcome::Coalesced;
            }

            state.in_flight = true;
            state.loading = !trigger.is_silent();
            state.phase = if state.token.is_some() {
                Phase::Rotating
            } else {
                Phase::Requesting
            };
            self.shared.publish(&state);
            (session_id, state.epoch)
        };

        let guard = InFlightGuard::new(&self.shared, epoch);
        let result = self
            .shared
            .issuer
            .request_token(session_id, trigger.is_forced())
            .await;
        let outcome = self.commit(session_id, epoch, result);
        guard.disarm();

        outcome
    }

    /// Current state
    pub fn snapshot(&self) -> ClientSnapshot {
        self.shared.lock_state().snapshot()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<ClientSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Countdown of the held token, `None` without a token
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.shared.remaining_seconds()
    }

    pub fn display_state(&self) -> DisplayState {
        let now = self.shared.clock.now();
        self.snapshot().display_state_at(now)
    }

    /// Whether a rotation timer is armed
    pub fn has_pending_rotation(&self) -> bool {
        self.shared.lock_state().timer.is_some()
    }

    /// Spawns a ticker publishing the countdown every tick interval
    ///
    /// The ticker stops once every receiver is dropped or the client is gone.
    pub fn spawn_countdown(&self) -> watch::Receiver<Option<u64>> {
        let (tx, rx) = watch::channel(self.remaining_seconds());
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let tick = self.shared.tick;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                let remaining = shared.remaining_seconds();
                drop(shared);

                if tx.send(remaining).is_err() {
                    break;
                }
            }
        });

        rx
    }

    /// Tears the client down: cancels the timer and ignores further triggers
    pub fn shutdown(&self) {
        let mut state = self.shared.lock_state();
        state.rebind(None);
        state.closed = true;
        self.shared.publish(&state);
        info!("Token display shut down");
    }

    fn commit(
        &self,
        session_id: SessionId,
        epoch: u64,
        result: Result<IssuedToken, ClientError>,
    ) -> RotationOutcome {
        let mut state = self.shared.lock_state();
        if state.epoch != epoch || state.session_id != Some(session_id) {
            debug!(session_id = %session_id, "Discarding response for a session that is no longer bound");
            return RotationOutcome::Discarded;
        }

        state.in_flight = false;
        state.loading = false;

        let outcome = match result {
            Ok(issued) if issued.session_id != session_id => {
                warn!(
                    requested = %session_id,
                    received = %issued.session_id,
                    "Issuer answered for a different session"
                );
                state.phase = state.settled_phase();
                RotationOutcome::Discarded
            }
            Ok(issued) => self.accept(&mut state, issued),
            Err(err) => self.reject(&mut state, session_id, err),
        };

        self.shared.publish(&state);
        outcome
    }

    fn accept(&self, state: &mut ClientState, issued: IssuedToken) -> RotationOutcome {
        let unchanged = state
            .token
            .as_ref()
            .map_or(false, |held| held.issued.same_as(&issued));

        let qr = match state.token.take() {
            Some(held) if held.value() == issued.token => held.qr,
            _ => self.render(&issued.token),
        };

        let expires_at = issued.expires_at;
        if unchanged {
            debug!(session_id = %issued.session_id, "Issuer returned the token already on screen");
        } else {
            info!(session_id = %issued.session_id, expires_at = %expires_at, "Displaying new attendance token");
        }

        state.token = Some(HeldToken { issued, qr });
        state.phase = Phase::Displaying;
        state.status = ClientStatus::Ready;
        self.schedule_rotation(state, expires_at);

        if unchanged {
            RotationOutcome::Unchanged
        } else {
            RotationOutcome::Committed
        }
    }

    fn reject(
        &self,
        state: &mut ClientState,
        session_id: SessionId,
        err: ClientError,
    ) -> RotationOutcome {
        match &err {
            ClientError::NoActiveSession => {
                state.cancel_timer();
                state.token = None;
                state.phase = Phase::Idle;
                state.status = ClientStatus::NoActiveSession;
            }
            ClientError::Unauthorized => {
                state.cancel_timer();
                state.phase = state.settled_phase();
                state.status = ClientStatus::Unauthorized;
            }
            ClientError::StaleResponse => {
                state.phase = state.settled_phase();
                return RotationOutcome::Discarded;
            }
            ClientError::RequestFailed { .. } | ClientError::InvalidResponse { .. } => {
                state.phase = state.settled_phase();
                state.status = ClientStatus::RequestFailed {
                    message: err.to_string(),
                };
            }
        }

        warn!(session_id = %session_id, "Token request failed: {}", err);
        RotationOutcome::Failed(err)
    }

    fn render(&self, value: &str) -> Option<RenderedQr> {
        match self.shared.renderer.render(value) {
            Ok(qr) => Some(qr),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Arms the single rotation timer at `max(0, expires_at - now) + grace`
    fn schedule_rotation(&self, state: &mut ClientState, expires_at: DateTime<Utc>) {
        state.cancel_timer();

        let until_expiry = (expires_at - self.shared.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let delay = until_expiry + self.shared.grace;

        state.timer_seq = state.timer_seq.wrapping_add(1);
        let seq = state.timer_seq;
        let weak = Arc::downgrade(&self.shared);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = weak.upgrade() else {
                return;
            };
            let client = TokenClient { shared };
            if client.take_timer(seq) {
                client.rotate(RotationTrigger::Scheduled).await;
            }
        });

        state.timer = Some(RotationTimer { seq, handle });
    }

    /// Releases the timer slot if it still belongs to timer `seq`
    fn take_timer(&self, seq: u64) -> bool {
        let mut state = self.shared.lock_state();
        match &state.timer {
            Some(timer) if timer.seq == seq => {
                state.timer = None;
                true
            }
            _ => false,
        }
    }
}
