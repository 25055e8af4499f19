use crate::{
    collaborators::{Coordinates, RecordingHandle},
    sos::SosState,
};

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use uuid::Uuid;

/// One activation, from confirmed hold to teardown. In memory only.
#[derive(Debug)]
pub struct SosSession {
    id: Uuid,
    state: SosState,
    started_at: Option<DateTime<Utc>>,
    recording_since: Option<Instant>,
    location: Option<Coordinates>,
    audio_handle: Option<RecordingHandle>,
}

impl SosSession {
    pub(crate) fn new(id: Uuid) -> Self {
        Self {
            id,
            state: SosState::Authenticating,
            started_at: None,
            recording_since: None,
            location: None,
            audio_handle: None,
        }
    }

    /// Session identifier for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state of this session.
    pub fn state(&self) -> SosState {
        self.state
    }

    /// Wall-clock time recording began.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Location fix attached at finalize.
    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Whether the session still owns a recording.
    pub fn is_recording(&self) -> bool {
        self.audio_handle.is_some()
    }

    pub(crate) fn set_state(&mut self, state: SosState) {
        self.state = state;
    }

    pub(crate) fn begin_recording(&mut self, handle: RecordingHandle) {
        self.started_at = Some(Utc::now());
        self.recording_since = Some(Instant::now());
        self.audio_handle = Some(handle);
    }

    /// Give up the recording handle so it can be stopped.
    pub(crate) fn take_handle(&mut self) -> Option<RecordingHandle> {
        self.audio_handle.take()
    }

    pub(crate) fn attach_location(&mut self, location: Option<Coordinates>) {
        self.location = location;
    }

    /// Whole seconds recorded so far.
    pub(crate) fn recorded_seconds(&self) -> u64 {
        self.recording_since
            .map(|since| since.elapsed().as_secs())
            .unwrap_or_default()
    }
}
