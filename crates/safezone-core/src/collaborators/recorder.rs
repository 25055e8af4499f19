use crate::{CoreResult, collaborators::Permission};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recording preset passed to [`AudioRecorder::start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordingQuality {
    /// Mono speech quality, smallest artifact.
    Low,
    /// Device-native channels and sample rate.
    #[default]
    High,
}

/// Opaque reference to an active recording.
///
/// Deliberately not `Clone`: the session that started the recording owns
/// the only handle and gives it up when the recording is stopped.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RecordingHandle(Uuid);

impl RecordingHandle {
    /// Mint a fresh handle. Called by recorder implementations.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier used by recorders to look the recording up.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordingHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Finished recording, readable as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Encoded audio file contents.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `audio/wav`.
    pub mime_type: String,
}

/// Starts and stops a recording session.
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Ask the operator for microphone access.
    async fn request_permission(&self) -> CoreResult<Permission>;

    /// Begin recording with the given preset.
    async fn start(&self, quality: RecordingQuality) -> CoreResult<RecordingHandle>;

    /// Stop the recording identified by `handle` and return its artifact.
    async fn stop(&self, handle: RecordingHandle) -> CoreResult<AudioArtifact>;
}
