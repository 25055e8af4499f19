//! Arming, hold-to-confirm and session bookkeeping for the SOS control.
//!
//! [`SosController`] is a cheap clonable handle. All mutable state sits behind
//! one async mutex so that a release racing the confirmation threshold is
//! decided in exactly one place: whichever side takes the lock first wins, and
//! the loser observes the new state and does nothing.

use crate::{
    collaborators::{
        AlertDispatcher, AudioRecorder, BiometricVerifier, LocationProvider, OperatorNotifier,
    },
    sos::{
        HoldStart, SessionOutcome, SosConfig, SosSession, SosSnapshot, SosState, activation,
    },
};

use std::sync::Arc;

use tokio::{
    sync::{Mutex, oneshot, watch},
    time::Instant,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// The platform capabilities the workflow drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Identity confirmation.
    pub biometric: Arc<dyn BiometricVerifier>,
    /// Location fixes.
    pub location: Arc<dyn LocationProvider>,
    /// Audio evidence capture.
    pub recorder: Arc<dyn AudioRecorder>,
    /// Alert transmission.
    pub dispatcher: Arc<dyn AlertDispatcher>,
    /// Operator-facing messages.
    pub notifier: Arc<dyn OperatorNotifier>,
}

/// Hold awaiting its confirmation threshold. Dropping it cancels the timer.
struct PendingHold {
    id: u64,
    started_at: Instant,
    _cancel: oneshot::Sender<()>,
}

#[derive(Default)]
struct Inner {
    armed: bool,
    state: SosState,
    hold: Option<PendingHold>,
    next_hold_id: u64,
    session_id: Option<Uuid>,
    recording: bool,
    alert_sent: bool,
    finished_sessions: u64,
    last_outcome: Option<SessionOutcome>,
    shut_down: bool,
}

impl Inner {
    fn snapshot(&self) -> SosSnapshot {
        SosSnapshot {
            state: self.state,
            armed: self.armed,
            session_id: self.session_id,
            hold_started_at: self.hold.as_ref().map(|h| h.started_at),
            recording: self.recording,
            alert_sent: self.alert_sent,
            finished_sessions: self.finished_sessions,
            last_outcome: self.last_outcome,
        }
    }

    fn resting_state(&self) -> SosState {
        if self.armed {
            SosState::Armed
        } else {
            SosState::Idle
        }
    }
}

pub(crate) struct Shared {
    pub(crate) config: SosConfig,
    pub(crate) deps: Collaborators,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<SosSnapshot>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.snapshot_tx.send_replace(inner.snapshot());
    }

    /// Move a running session to `state` and publish it.
    pub(crate) async fn transition(&self, session: &mut SosSession, state: SosState) {
        session.set_state(state);

        let mut inner = self.inner.lock().await;
        inner.state = state;
        inner.recording = session.is_recording();
        self.publish(&inner);

        debug!(session_id = %session.id(), state = ?state, "SOS state changed");
    }

    pub(crate) async fn mark_alert_sent(&self) {
        let mut inner = self.inner.lock().await;
        inner.alert_sent = true;
        self.publish(&inner);
    }

    /// Called by the hold task once the threshold elapsed. Returns the new
    /// session only if this hold is still the pending one.
    async fn confirm_hold(&self, hold_id: u64) -> Option<SosSession> {
        let mut inner = self.inner.lock().await;

        match inner.hold.as_ref() {
            Some(hold) if hold.id == hold_id && inner.state == SosState::Confirming => {}
            _ => {
                debug!(hold_id, "Hold no longer pending, activation skipped");
                return None;
            }
        }

        inner.hold = None;

        if !inner.armed || inner.shut_down {
            inner.state = inner.resting_state();
            self.publish(&inner);
            return None;
        }

        let session = SosSession::new(Uuid::new_v4());
        inner.state = session.state();
        inner.session_id = Some(session.id());
        self.publish(&inner);

        info!(session_id = %session.id(), "Hold confirmed, SOS activation started");

        Some(session)
    }

    /// Publish the terminal state, then return to rest.
    async fn finish(&self, session: SosSession, outcome: SessionOutcome) {
        let mut inner = self.inner.lock().await;

        inner.state = outcome.terminal_state();
        inner.finished_sessions += 1;
        inner.last_outcome = Some(outcome);
        self.publish(&inner);

        inner.state = inner.resting_state();
        inner.session_id = None;
        inner.recording = false;
        inner.alert_sent = false;
        self.publish(&inner);

        info!(session_id = %session.id(), outcome = ?outcome, "SOS session finished");
    }
}

/// Drives the SOS control: arming, hold-to-confirm, and activation.
///
/// Owned by the screen or view-model that shows the control. Construct it on
/// mount and call [`shutdown`](Self::shutdown) on unmount.
#[derive(Clone)]
pub struct SosController {
    shared: Arc<Shared>,
}

impl SosController {
    /// Create a disarmed controller.
    pub fn new(config: SosConfig, deps: Collaborators) -> Self {
        let inner = Inner::default();
        let (snapshot_tx, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                config,
                deps,
                inner: Mutex::new(inner),
                snapshot_tx,
            }),
        }
    }

    /// Timing and policy in effect.
    pub fn config(&self) -> &SosConfig {
        &self.shared.config
    }

    /// Enable the SOS control.
    #[instrument(skip(self))]
    pub async fn arm(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.armed = true;
        if inner.state == SosState::Idle {
            inner.state = SosState::Armed;
        }
        self.shared.publish(&inner);

        info!("SOS armed");
    }

    /// Disable the SOS control. A pending hold is cancelled; a running
    /// session is not interrupted.
    #[instrument(skip(self))]
    pub async fn disarm(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.armed = false;
        match inner.state {
            SosState::Confirming => {
                inner.hold = None;
                inner.state = SosState::Idle;
                debug!("Pending hold cancelled by disarm");
            }
            SosState::Armed => inner.state = SosState::Idle,
            _ => {}
        }
        self.shared.publish(&inner);

        info!("SOS disarmed");
    }

    /// Flip the armed flag and return its new value.
    pub async fn toggle_armed(&self) -> bool {
        if self.is_armed().await {
            self.disarm().await;
            false
        } else {
            self.arm().await;
            true
        }
    }

    /// Whether SOS is armed.
    pub async fn is_armed(&self) -> bool {
        self.shared.inner.lock().await.armed
    }

    /// Press-in on the SOS control.
    ///
    /// Starts the confirmation timer when armed and no session is running.
    /// If the threshold elapses while still held and armed, the activation
    /// sequence runs on a background task.
    #[instrument(skip(self))]
    pub async fn begin_hold(&self) -> HoldStart {
        let mut inner = self.shared.inner.lock().await;

        if inner.shut_down {
            return HoldStart::Busy;
        }
        if !inner.armed {
            debug!("Hold ignored, SOS is disarmed");
            return HoldStart::NotArmed;
        }
        if inner.state != SosState::Armed {
            warn!(state = ?inner.state, "Hold rejected, SOS already in progress");
            return HoldStart::Busy;
        }

        let hold_id = inner.next_hold_id;
        inner.next_hold_id += 1;

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        inner.hold = Some(PendingHold {
            id: hold_id,
            started_at: Instant::now(),
            _cancel: cancel_tx,
        });
        inner.state = SosState::Confirming;
        self.shared.publish(&inner);
        drop(inner);

        let shared = Arc::clone(&self.shared);
        let threshold = shared.config.confirm_hold();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(threshold) => {}
                _ = cancel_rx => {
                    debug!(hold_id, "Hold released before threshold");
                    return;
                }
            }

            let Some(mut session) = shared.confirm_hold(hold_id).await else {
                return;
            };

            let outcome = activation::run(&shared, &mut session).await;
            shared.finish(session, outcome).await;
        });

        debug!(hold_id, threshold_ms = threshold.as_millis(), "Hold started");

        HoldStart::Started
    }

    /// Press-out on the SOS control. Returns true if a pending hold was
    /// cancelled; once activation has begun there is nothing to cancel.
    #[instrument(skip(self))]
    pub async fn end_hold(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;

        if inner.state != SosState::Confirming {
            return false;
        }

        inner.hold = None;
        inner.state = inner.resting_state();
        self.shared.publish(&inner);

        debug!("Hold cancelled");

        true
    }

    /// Fraction of the confirmation threshold elapsed, in `[0, 1]`.
    /// Zero when no hold is pending.
    pub fn hold_progress(&self) -> f32 {
        let snapshot = self.snapshot();
        match (snapshot.state, snapshot.hold_started_at) {
            (SosState::Confirming, Some(started_at)) => {
                let threshold = self.shared.config.confirm_hold();
                if threshold.is_zero() {
                    return 1.0;
                }
                (started_at.elapsed().as_secs_f32() / threshold.as_secs_f32()).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SosSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SosSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Tear the controller down.
    ///
    /// Cancels a pending hold and rejects further holds. A session already
    /// past confirmation runs its full capture window and dispatches.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.shut_down = true;
        if inner.state == SosState::Confirming {
            inner.hold = None;
            inner.state = inner.resting_state();
        }
        self.shared.publish(&inner);
        drop(inner);

        info!("SOS controller shut down");
    }
}
