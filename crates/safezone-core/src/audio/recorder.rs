use crate::{
    CoreResult, SosError,
    audio::{
        capture::{self, CaptureFormat, CaptureThread},
        wav,
    },
    collaborators::{AudioArtifact, AudioRecorder, Permission, RecordingHandle, RecordingQuality},
};

use std::{panic::Location, sync::Mutex};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use uuid::Uuid;

struct ActiveRecording {
    id: Uuid,
    quality: RecordingQuality,
    capture: CaptureThread,
}

/// [`AudioRecorder`] backed by the host's default microphone.
///
/// Holds at most one recording. The artifact is a 16-bit PCM WAV file.
#[derive(Default)]
pub struct MicrophoneRecorder {
    active: Mutex<Option<ActiveRecording>>,
}

impl MicrophoneRecorder {
    /// Create an idle recorder. The device is opened on [`AudioRecorder::start`].
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn lock_active(&self) -> CoreResult<std::sync::MutexGuard<'_, Option<ActiveRecording>>> {
        self.active.lock().map_err(|e| SosError::DeviceError {
            reason: format!("Recorder state lock poisoned: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[async_trait]
impl AudioRecorder for MicrophoneRecorder {
    #[instrument(skip(self))]
    async fn request_permission(&self) -> CoreResult<Permission> {
        let available = tokio::task::spawn_blocking(capture::input_available)
            .await
            .map_err(|e| SosError::DeviceError {
                reason: format!("Device lookup task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(if available {
            Permission::Granted
        } else {
            Permission::Denied
        })
    }

    #[instrument(skip(self))]
    async fn start(&self, quality: RecordingQuality) -> CoreResult<RecordingHandle> {
        let busy = self.lock_active()?.is_some();
        if busy {
            return Err(SosError::RecordingStartFailed {
                reason: "A recording is already in progress".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let capture = tokio::task::spawn_blocking(CaptureThread::spawn)
            .await
            .map_err(|e| SosError::RecordingStartFailed {
                reason: format!("Capture start task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        let handle = RecordingHandle::new();

        // Another start may have won while the device was opening.
        let rejected = {
            let mut active = self.lock_active()?;
            if active.is_some() {
                Some(capture)
            } else {
                *active = Some(ActiveRecording {
                    id: handle.id(),
                    quality,
                    capture,
                });
                None
            }
        };

        if let Some(capture) = rejected {
            let _ = tokio::task::spawn_blocking(move || capture.stop()).await;
            return Err(SosError::RecordingStartFailed {
                reason: "A recording is already in progress".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(handle = %handle, quality = ?quality, "Microphone recording started");

        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn stop(&self, handle: RecordingHandle) -> CoreResult<AudioArtifact> {
        let recording = {
            let mut active = self.lock_active()?;
            match active.take() {
                Some(recording) if recording.id == handle.id() => recording,
                other => {
                    *active = other;
                    return Err(SosError::RecordingStopFailed {
                        reason: format!("Unknown recording handle {}", handle),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        };

        let quality = recording.quality;
        let bytes = tokio::task::spawn_blocking(move || -> CoreResult<Vec<u8>> {
            let captured = recording.capture.stop()?;
            match quality {
                RecordingQuality::High => wav::encode_wav(&captured.samples, captured.format),
                RecordingQuality::Low => wav::encode_wav(
                    &wav::downmix(&captured.samples, captured.format.channels),
                    CaptureFormat {
                        sample_rate: captured.format.sample_rate,
                        channels: 1,
                    },
                ),
            }
        })
        .await
        .map_err(|e| SosError::RecordingStopFailed {
            reason: format!("Capture stop task failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

        debug!(handle = %handle, bytes = bytes.len(), "Recording encoded");

        Ok(AudioArtifact {
            bytes,
            mime_type: wav::WAV_MIME_TYPE.to_string(),
        })
    }
}
