use crate::{
    AbortReason, BiometricPolicy, SessionOutcome, SosConfig, SosState,
    collaborators::{BiometricOutcome, Notice, Permission},
    tests::fakes::{FAKE_AUDIO, FAKE_MIME, Fakes, Harness, LIMA},
};

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};

/// WHAT: Full activation records once, stops once, dispatches once
/// WHY: End-to-end contract of the SOS workflow
#[tokio::test(start_paused = true)]
async fn given_all_collaborators_succeed_when_hold_completes_then_alert_dispatched_with_location() {
    // Given: Biometrics succeed, location is Lima, recorder and dispatcher work
    let h = Harness::new(Fakes::default());

    // When: The operator holds past the threshold
    let snapshot = h.activate().await;

    // Then: Exactly one record/stop/submit cycle with the Lima fix
    assert_eq!(h.confirm_calls(), 1);
    assert_eq!(h.recorder.start_count(), 1);
    assert_eq!(h.recorder.stop_count(), 1);

    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].audio_base64, STANDARD.encode(FAKE_AUDIO));
    assert_eq!(payloads[0].mime_type, FAKE_MIME);
    assert_eq!(payloads[0].lat, Some(LIMA.lat));
    assert_eq!(payloads[0].lng, Some(LIMA.lng));
    assert_eq!(payloads[0].duration_seconds, 10);
    assert!(payloads[0].started_at.is_some());

    // And: The controller is armed and ready, not idle
    assert_eq!(snapshot.last_outcome, Some(SessionOutcome::Delivered));
    assert_eq!(h.controller.snapshot().state, SosState::Armed);
    assert!(!h.controller.snapshot().recording);
    assert!(!h.controller.snapshot().alert_sent);

    let notices = h.notifier.notices();
    assert!(notices.contains(&Notice::ActivationStarted));
    assert!(notices.iter().any(|n| matches!(n, Notice::AlertDelivered { .. })));
}

/// WHAT: Recording lasts exactly the capture window
/// WHY: The window is a fixed wall-clock timer with no extension
#[tokio::test(start_paused = true)]
async fn given_activation_when_window_elapses_then_stop_called_exactly_window_after_start() {
    // Given: Default 10s capture window
    let h = Harness::new(Fakes::default());

    // When: An activation runs to completion
    h.activate().await;

    // Then: stop() came exactly 10s after start()
    assert_eq!(h.recorder.recorded_span(), Some(Duration::from_secs(10)));
}

/// WHAT: Shortened windows from config are honored
/// WHY: Timing literals live in configuration for testability
#[tokio::test(start_paused = true)]
async fn given_short_window_config_when_activated_then_window_matches_config() {
    // Given: A 1.5s capture window
    let config = SosConfig {
        capture_window_ms: 1_500,
        ..SosConfig::default()
    };
    let h = Harness::with_config(Fakes::default(), config);

    // When: An activation runs
    h.activate().await;

    // Then: The recording spans 1.5s
    assert_eq!(h.recorder.recorded_span(), Some(Duration::from_millis(1_500)));
}

/// WHAT: Location permission denial does not block the alert
/// WHY: Location is best-effort; the alert must still go out
#[tokio::test(start_paused = true)]
async fn given_location_denied_when_activated_then_alert_sent_without_coordinates() {
    // Given: Location permission is denied
    let mut fakes = Fakes::default();
    fakes.location.permission = Permission::Denied;
    let h = Harness::new(fakes);

    // When: An activation runs
    let snapshot = h.activate().await;

    // Then: The alert omits coordinates and the session completes
    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].lat, None);
    assert_eq!(payloads[0].lng, None);
    assert_eq!(snapshot.last_outcome, Some(SessionOutcome::Delivered));
    assert_eq!(h.location.fix_calls.load(std::sync::atomic::Ordering::SeqCst), 0);

    // And: Location problems are never shown to the operator
    assert!(h.notifier.errors().is_empty());
}

/// WHAT: A failed location fix does not block the alert
/// WHY: Graceful degradation when GPS has no signal
#[tokio::test(start_paused = true)]
async fn given_location_fix_fails_when_activated_then_alert_sent_without_coordinates() {
    // Given: The provider cannot produce a fix
    let mut fakes = Fakes::default();
    fakes.location.fix = None;
    let h = Harness::new(fakes);

    // When: An activation runs
    h.activate().await;

    // Then: The alert is sent without coordinates
    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].coordinates().is_none());
    assert_eq!(h.controller.snapshot().state, SosState::Armed);
}

/// WHAT: A fix that arrives after the window is still included
/// WHY: Dispatch waits for the location task instead of dropping a late fix
#[tokio::test(start_paused = true)]
async fn given_slow_location_when_window_ends_then_dispatch_waits_for_fix() {
    // Given: A fix that takes longer than the capture window
    let mut fakes = Fakes::default();
    fakes.location.delay = Duration::from_secs(15);
    let h = Harness::new(fakes);

    // When: An activation runs
    let started = tokio::time::Instant::now();
    h.activate().await;

    // Then: The alert carried the late fix and went out after it arrived
    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].coordinates(), Some(LIMA));
    assert!(started.elapsed() >= Duration::from_secs(15));

    // Then: The recorded duration covers only the capture window
    assert_eq!(payloads[0].duration_seconds, 10);
    assert_eq!(h.recorder.recorded_span(), Some(Duration::from_secs(10)));
}

/// WHAT: Devices without biometrics skip confirmation
/// WHY: Default fail-open policy for unsupported hardware
#[tokio::test(start_paused = true)]
async fn given_no_biometric_hardware_when_activated_then_recording_starts_without_prompt() {
    // Given: A device without biometric capability
    let mut fakes = Fakes::default();
    fakes.biometric.capable = false;
    let h = Harness::new(fakes);

    // When: An activation runs
    h.activate().await;

    // Then: No prompt, but recording and dispatch happen
    assert_eq!(h.capability_calls(), 1);
    assert_eq!(h.confirm_calls(), 0);
    assert_eq!(h.recorder.start_count(), 1);
    assert_eq!(h.dispatcher.payloads().len(), 1);
}

/// WHAT: Fail-closed policy aborts without biometrics
/// WHY: Operators may require identity confirmation unconditionally
#[tokio::test(start_paused = true)]
async fn given_fail_closed_policy_and_no_biometrics_when_activated_then_aborted() {
    // Given: No biometric hardware and fail-closed policy
    let mut fakes = Fakes::default();
    fakes.biometric.capable = false;
    let config = SosConfig {
        biometric_policy: BiometricPolicy::FailClosed,
        ..SosConfig::default()
    };
    let h = Harness::with_config(fakes, config);

    // When: An activation runs
    let snapshot = h.activate().await;

    // Then: Nothing is recorded, the operator is told why
    assert_eq!(
        snapshot.last_outcome,
        Some(SessionOutcome::Aborted(AbortReason::BiometricUnavailable))
    );
    assert_eq!(h.recorder.start_count(), 0);
    assert!(h.dispatcher.payloads().is_empty());
    assert_eq!(h.notifier.errors(), vec![Notice::BiometricUnavailable]);
}

/// WHAT: A cancelled biometric prompt aborts silently
/// WHY: Denial must have no side effects at all
#[tokio::test(start_paused = true)]
async fn given_biometric_cancelled_when_activated_then_aborted_silently() {
    // Given: The operator dismisses the biometric prompt
    let mut fakes = Fakes::default();
    fakes.biometric.outcome = BiometricOutcome::Cancelled;
    let h = Harness::new(fakes);

    // When: An activation runs
    let snapshot = h.activate().await;

    // Then: No audio, no alert, no message, back to Armed
    assert_eq!(
        snapshot.last_outcome,
        Some(SessionOutcome::Aborted(AbortReason::BiometricDenied))
    );
    assert_eq!(h.recorder.start_count(), 0);
    assert!(h.dispatcher.payloads().is_empty());
    assert!(h.notifier.notices().is_empty());
    assert_eq!(h.controller.snapshot().state, SosState::Armed);
}

/// WHAT: Microphone denial aborts with a message
/// WHY: Evidence capture requires microphone access
#[tokio::test(start_paused = true)]
async fn given_microphone_denied_when_activated_then_aborted_and_notified_once() {
    // Given: Microphone permission is denied
    let mut fakes = Fakes::default();
    fakes.recorder.permission = Permission::Denied;
    let h = Harness::new(fakes);

    // When: An activation runs
    let snapshot = h.activate().await;

    // Then: No recording, no alert, one notice
    assert_eq!(
        snapshot.last_outcome,
        Some(SessionOutcome::Aborted(AbortReason::MicrophoneDenied))
    );
    assert_eq!(h.recorder.start_count(), 0);
    assert!(h.dispatcher.payloads().is_empty());
    assert_eq!(h.notifier.errors(), vec![Notice::MicrophoneDenied]);
}

/// WHAT: Recorder start failure aborts back to Armed
/// WHY: The operator must be able to retry immediately
#[tokio::test(start_paused = true)]
async fn given_recorder_start_fails_when_activated_then_aborted_and_armed() {
    // Given: The recorder cannot start
    let mut fakes = Fakes::default();
    fakes.recorder.fail_start = true;
    let h = Harness::new(fakes);

    // When: An activation runs
    h.activate().await;

    // Then: The failure is surfaced and the controller is ready again
    assert_eq!(
        h.notifier.errors(),
        vec![Notice::RecordingFailed {
            reason: "Microphone busy".to_string()
        }]
    );
    assert!(h.dispatcher.payloads().is_empty());
    assert_eq!(h.controller.snapshot().state, SosState::Armed);
}

/// WHAT: Dispatch failure still completes the session
/// WHY: Evidence is not retried; the machine must not get stuck
#[tokio::test(start_paused = true)]
async fn given_dispatch_fails_when_window_ends_then_error_notified_once_and_armed() {
    // Given: The dispatcher rejects every submission
    let mut fakes = Fakes::default();
    fakes.dispatcher.failure = Some("Service unavailable".to_string());
    let h = Harness::new(fakes);

    // When: An activation runs
    let snapshot = h.activate().await;

    // Then: One submission, one error notice, back to Armed
    assert_eq!(h.dispatcher.payloads().len(), 1);
    assert_eq!(
        h.notifier.errors(),
        vec![Notice::DispatchFailed {
            reason: "Service unavailable".to_string()
        }]
    );
    assert_eq!(snapshot.last_outcome, Some(SessionOutcome::DispatchFailed));
    assert_eq!(h.controller.snapshot().state, SosState::Armed);
    assert_eq!(h.recorder.stop_count(), 1);
}

/// WHAT: A failed stop still dispatches the alert without audio
/// WHY: Location and the alert itself matter more than the evidence
#[tokio::test(start_paused = true)]
async fn given_recorder_stop_fails_when_finalizing_then_alert_sent_without_audio() {
    // Given: The recorder fails on stop
    let mut fakes = Fakes::default();
    fakes.recorder.fail_stop = true;
    let h = Harness::new(fakes);

    // When: An activation runs
    h.activate().await;

    // Then: The alert still goes out, with empty audio and the fix
    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].audio_base64.is_empty());
    assert_eq!(payloads[0].coordinates(), Some(LIMA));
    assert!(
        h.notifier
            .errors()
            .iter()
            .any(|n| matches!(n, Notice::EvidenceLost { .. }))
    );
}

/// WHAT: Shutdown during the window lets it run to completion
/// WHY: Teardown must not shorten the evidence being captured
#[tokio::test(start_paused = true)]
async fn given_recording_session_when_controller_shut_down_then_full_window_recorded() {
    // Given: A session one second into its capture window
    let h = Harness::new(Fakes::default());
    h.controller.arm().await;
    h.controller.begin_hold().await;
    tokio::time::sleep(Duration::from_millis(3_000)).await;
    assert_eq!(h.controller.snapshot().state, SosState::Recording);

    // When: The controller is shut down
    h.controller.shutdown().await;
    h.wait_finished(1).await;

    // Then: The full window was recorded and the alert was sent
    let window = SosConfig::default().capture_window();
    assert_eq!(h.recorder.recorded_span(), Some(window));
    let payloads = h.dispatcher.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].duration_seconds, 10);
}

/// WHAT: Shutdown right as recording starts still records the full window
/// WHY: The window length is fixed once the session is confirmed
#[tokio::test(start_paused = true)]
async fn given_session_entering_recording_when_controller_shut_down_then_full_window_recorded() {
    // Given: A session that has just started recording
    let h = Harness::new(Fakes::default());
    h.controller.arm().await;
    h.controller.begin_hold().await;
    let mut updates = h.controller.subscribe();
    let _ = updates.wait_for(|s| s.state == SosState::Recording).await;

    // When: The controller is shut down immediately
    h.controller.shutdown().await;
    let snapshot = h.wait_finished(1).await;

    // Then: Recording ran for the whole window and new holds are refused
    assert_eq!(
        h.recorder.recorded_span(),
        Some(SosConfig::default().capture_window())
    );
    assert_eq!(h.dispatcher.payloads().len(), 1);
    assert_eq!(snapshot.finished_sessions, 1);
}
