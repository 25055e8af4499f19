use tokio::time::Instant;
use uuid::Uuid;

/// Position of the controller in the SOS state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SosState {
    /// SOS is disarmed; holds are ignored.
    #[default]
    Idle,
    /// Ready for a hold.
    Armed,
    /// Control is held; activation fires when the threshold elapses.
    Confirming,
    /// Waiting on identity confirmation.
    Authenticating,
    /// Evidence is being captured.
    Recording,
    /// Recording stopped; alert being submitted.
    Dispatching,
    /// Session ended after a dispatch attempt.
    Completed,
    /// Session ended before anything was recorded.
    Aborted,
}

impl SosState {
    /// States owned by a running session. At most one session may be in
    /// any of these at a time.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            SosState::Authenticating | SosState::Recording | SosState::Dispatching
        )
    }
}

/// Result of [`SosController::begin_hold`](crate::SosController::begin_hold).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStart {
    /// A hold is pending; release before the threshold cancels it.
    Started,
    /// SOS is disarmed.
    NotArmed,
    /// A hold or session is already in progress, or the controller is shut down.
    Busy,
}

/// Why a session ended without recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Identity confirmation failed or was cancelled.
    BiometricDenied,
    /// Identity confirmation required but unavailable.
    BiometricUnavailable,
    /// Microphone access refused.
    MicrophoneDenied,
    /// The recorder could not start.
    RecordingStartFailed,
}

/// How the last session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Alert accepted by the notification service.
    Delivered,
    /// Evidence was captured but the alert was not delivered.
    DispatchFailed,
    /// Session aborted before recording.
    Aborted(AbortReason),
}

impl SessionOutcome {
    /// Terminal state published for this outcome.
    pub fn terminal_state(self) -> SosState {
        match self {
            SessionOutcome::Delivered | SessionOutcome::DispatchFailed => SosState::Completed,
            SessionOutcome::Aborted(_) => SosState::Aborted,
        }
    }
}

/// Observable view of the controller, published on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SosSnapshot {
    /// Current state.
    pub state: SosState,
    /// Whether SOS is armed.
    pub armed: bool,
    /// Session currently running, if any.
    pub session_id: Option<Uuid>,
    /// When the pending hold began, while `Confirming`.
    pub hold_started_at: Option<Instant>,
    /// Recording indicator.
    pub recording: bool,
    /// Alert-sent indicator.
    pub alert_sent: bool,
    /// Number of sessions that reached `Completed` or `Aborted`.
    pub finished_sessions: u64,
    /// Outcome of the most recent finished session.
    pub last_outcome: Option<SessionOutcome>,
}
