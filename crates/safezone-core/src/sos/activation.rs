//! The activation sequence: identity, evidence, location, window, dispatch.

use crate::{
    SosError,
    collaborators::{
        AlertPayload, BiometricOutcome, Coordinates, LocationProvider, Notice, Permission,
    },
    sos::{AbortReason, BiometricPolicy, SessionOutcome, SosSession, SosState, controller::Shared},
};

use std::{panic::Location, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use error_location::ErrorLocation;
use tracing::{debug, info, warn};

/// MIME type reported when no artifact could be read.
const FALLBACK_MIME_TYPE: &str = "audio/wav";

/// Run one activation to completion. Never fails: every error is turned into
/// an operator notice and a [`SessionOutcome`].
pub(crate) async fn run(shared: &Shared, session: &mut SosSession) -> SessionOutcome {
    let deps = &shared.deps;
    let session_id = session.id();

    // 1. Identity confirmation.
    if let Err(e) = confirm_identity(shared).await {
        return match e {
            SosError::BiometricUnavailable { .. } => {
                warn!(session_id = %session_id, error = %e, "Activation aborted");
                deps.notifier.notify(Notice::BiometricUnavailable).await;
                SessionOutcome::Aborted(AbortReason::BiometricUnavailable)
            }
            _ => {
                info!(session_id = %session_id, error = %e, "Activation aborted");
                SessionOutcome::Aborted(AbortReason::BiometricDenied)
            }
        };
    }

    // 2. Evidence capture start.
    match deps.recorder.request_permission().await {
        Ok(Permission::Granted) => {}
        Ok(Permission::Denied) | Err(_) => {
            let e = SosError::MicrophonePermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            };
            warn!(session_id = %session_id, error = %e, "Activation aborted");
            deps.notifier.notify(Notice::MicrophoneDenied).await;
            return SessionOutcome::Aborted(AbortReason::MicrophoneDenied);
        }
    }

    let handle = match deps.recorder.start(shared.config.recording_quality).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Activation aborted");
            deps.notifier
                .notify(Notice::RecordingFailed {
                    reason: e.user_message(),
                })
                .await;
            return SessionOutcome::Aborted(AbortReason::RecordingStartFailed);
        }
    };

    debug!(session_id = %session_id, handle = %handle, "Recording handle acquired");
    session.begin_recording(handle);
    shared.transition(session, SosState::Recording).await;

    // 3. Location capture, joined at finalize.
    let location_task = tokio::spawn(fetch_location(Arc::clone(&deps.location)));

    // 4. Operator feedback.
    let notifier = Arc::clone(&deps.notifier);
    tokio::spawn(async move { notifier.notify(Notice::ActivationStarted).await });

    // 5. Capture window.
    let window = shared.config.capture_window();
    tokio::time::sleep(window).await;

    // 6. Finalize and dispatch.
    let duration_seconds = session.recorded_seconds();
    shared.transition(session, SosState::Dispatching).await;

    let (audio_base64, mime_type) = match session.take_handle() {
        Some(handle) => match deps.recorder.stop(handle).await {
            Ok(artifact) => {
                debug!(
                    session_id = %session_id,
                    bytes = artifact.bytes.len(),
                    "Audio artifact retrieved"
                );
                (STANDARD.encode(&artifact.bytes), artifact.mime_type)
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Dispatching alert without audio");
                deps.notifier
                    .notify(Notice::EvidenceLost {
                        reason: e.user_message(),
                    })
                    .await;
                (String::new(), FALLBACK_MIME_TYPE.to_string())
            }
        },
        None => (String::new(), FALLBACK_MIME_TYPE.to_string()),
    };

    let location = match location_task.await {
        Ok(location) => location,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Location task failed");
            None
        }
    };
    session.attach_location(location);

    let payload = AlertPayload {
        audio_base64,
        mime_type,
        duration_seconds,
        started_at: session.started_at(),
        lat: location.map(|c| c.lat),
        lng: location.map(|c| c.lng),
    };

    // 7. Outcome; teardown happens in the controller.
    match deps.dispatcher.submit(&payload).await {
        Ok(receipt) => {
            info!(
                session_id = %session_id,
                has_location = location.is_some(),
                "Alert dispatched"
            );
            shared.mark_alert_sent().await;
            deps.notifier
                .notify(Notice::AlertDelivered {
                    message: receipt.message,
                })
                .await;
            SessionOutcome::Delivered
        }
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Alert dispatch failed");
            deps.notifier
                .notify(Notice::DispatchFailed {
                    reason: e.user_message(),
                })
                .await;
            SessionOutcome::DispatchFailed
        }
    }
}

/// Ask the biometric verifier, applying the configured policy when the
/// device has no usable capability.
async fn confirm_identity(shared: &Shared) -> Result<(), SosError> {
    let biometric = &shared.deps.biometric;

    let capable = match biometric.has_capability().await {
        Ok(capable) => capable,
        Err(e) => {
            warn!(error = %e, "Biometric capability check failed, treating as unavailable");
            false
        }
    };

    if !capable {
        return match shared.config.biometric_policy {
            BiometricPolicy::FailOpen => {
                info!("No biometric capability, skipping identity confirmation");
                Ok(())
            }
            BiometricPolicy::FailClosed => Err(SosError::BiometricUnavailable {
                location: ErrorLocation::from(Location::caller()),
            }),
        };
    }

    match biometric.confirm(&shared.config.biometric_prompt).await {
        Ok(BiometricOutcome::Success) => Ok(()),
        Ok(outcome) => {
            debug!(outcome = ?outcome, "Biometric confirmation not granted");
            Err(SosError::BiometricDenied {
                location: ErrorLocation::from(Location::caller()),
            })
        }
        Err(e) => {
            debug!(error = %e, "Biometric prompt failed");
            Err(SosError::BiometricDenied {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

/// Best-effort single fix. Failures are logged and never reach the operator.
async fn fetch_location(provider: Arc<dyn LocationProvider>) -> Option<Coordinates> {
    match provider.request_permission().await {
        Ok(Permission::Granted) => {}
        Ok(Permission::Denied) => {
            let e = SosError::LocationPermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            };
            warn!(error = %e, "Alert will be sent without coordinates");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Location permission request failed");
            return None;
        }
    }

    match provider.current_fix().await {
        Ok(fix) => {
            debug!(location = %fix, "Location fix acquired");
            Some(fix)
        }
        Err(e) => {
            warn!(error = %e, "Alert will be sent without coordinates");
            None
        }
    }
}
