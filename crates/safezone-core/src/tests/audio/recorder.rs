use crate::{
    MicrophoneRecorder, SosError,
    collaborators::{AudioRecorder, Permission, RecordingHandle, RecordingQuality},
};

use std::time::Duration;

/// WHAT: Stopping with an unknown handle fails
/// WHY: Only the session that started a recording may stop it
#[tokio::test]
async fn given_idle_recorder_when_stopping_unknown_handle_then_stop_failed_error() {
    // Given: A recorder with nothing running
    let recorder = MicrophoneRecorder::new();

    // When: Stopping a handle it never issued
    let result = recorder.stop(RecordingHandle::new()).await;

    // Then: Returns RecordingStopFailed
    assert!(matches!(result, Err(SosError::RecordingStopFailed { .. })));
}

/// WHAT: Full microphone cycle yields a WAV artifact
/// WHY: Validates cpal capture and encoding on real hardware
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
async fn given_microphone_when_recording_briefly_then_wav_artifact_returned() {
    // Given: A host with a microphone
    let recorder = MicrophoneRecorder::new();
    assert_eq!(recorder.request_permission().await.unwrap(), Permission::Granted);

    // When: Recording for half a second
    let handle = recorder.start(RecordingQuality::Low).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let artifact = recorder.stop(handle).await.unwrap();

    // Then: A WAV artifact is returned
    assert_eq!(artifact.mime_type, "audio/wav");
    assert_eq!(&artifact.bytes[0..4], b"RIFF");
}

/// WHAT: A second start while recording is refused
/// WHY: The recorder holds at most one recording
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
async fn given_active_recording_when_starting_again_then_start_failed_error() {
    // Given: A recording in progress
    let recorder = MicrophoneRecorder::new();
    let handle = recorder.start(RecordingQuality::High).await.unwrap();

    // When: Starting another
    let second = recorder.start(RecordingQuality::High).await;

    // Then: Refused, and the first recording still stops cleanly
    assert!(matches!(second, Err(SosError::RecordingStartFailed { .. })));
    assert!(recorder.stop(handle).await.is_ok());
}
