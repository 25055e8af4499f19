//! First-launch notices, remembered in the flag store.

use safezone_core::collaborators::{AudioRecorder, FlagStore, LocationProvider, Permission, flags};
use tracing::{info, instrument, warn};

/// A notice to show once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    /// How to arm and trigger SOS.
    Welcome,
    /// No usable microphone; alerts would go out without audio evidence.
    MicrophoneUnavailable,
    /// No location source; alerts would go out without coordinates.
    LocationUnavailable,
}

impl OnboardingStep {
    /// Notification summary.
    pub fn title(self) -> &'static str {
        match self {
            OnboardingStep::Welcome => "Welcome to SafeZone",
            OnboardingStep::MicrophoneUnavailable => "No microphone found",
            OnboardingStep::LocationUnavailable => "No location configured",
        }
    }

    /// Notification body.
    pub fn body(self) -> &'static str {
        match self {
            OnboardingStep::Welcome => {
                "Press CTRL+SHIFT+A to arm SOS, then hold CTRL+SHIFT+S to record \
                 and alert your emergency contacts."
            }
            OnboardingStep::MicrophoneUnavailable => {
                "SOS cannot start without a microphone. Connect one and try again."
            }
            OnboardingStep::LocationUnavailable => {
                "Set [location] fixed in config.toml to include your position in alerts."
            }
        }
    }
}

/// Work out which first-launch notices are due and mark them as seen.
///
/// A step is returned even when its flag cannot be written; checking stops
/// there so later notices are not lost to a broken store.
#[instrument(skip_all)]
pub async fn first_launch(
    store: &mut dyn FlagStore,
    recorder: &dyn AudioRecorder,
    location: &dyn LocationProvider,
) -> Vec<OnboardingStep> {
    let mut steps = Vec::new();

    if !store.get_flag(flags::ONBOARDING_SEEN) {
        steps.push(OnboardingStep::Welcome);
        if !mark_seen(store, flags::ONBOARDING_SEEN) {
            return steps;
        }
    }

    if !store.get_flag(flags::MICROPHONE_PROMPTED) {
        let permission = recorder.request_permission().await.unwrap_or_else(|e| {
            warn!(error = %e, "Microphone permission check failed");
            Permission::Denied
        });
        if !permission.is_granted() {
            steps.push(OnboardingStep::MicrophoneUnavailable);
        }
        if !mark_seen(store, flags::MICROPHONE_PROMPTED) {
            return steps;
        }
    }

    if !store.get_flag(flags::LOCATION_PROMPTED) {
        let permission = location.request_permission().await.unwrap_or_else(|e| {
            warn!(error = %e, "Location permission check failed");
            Permission::Denied
        });
        if !permission.is_granted() {
            steps.push(OnboardingStep::LocationUnavailable);
        }
        if !mark_seen(store, flags::LOCATION_PROMPTED) {
            return steps;
        }
    }

    info!(steps = steps.len(), "Onboarding checked");

    steps
}

fn mark_seen(store: &mut dyn FlagStore, key: &str) -> bool {
    match store.set_flag(key, true) {
        Ok(()) => true,
        Err(e) => {
            warn!(flag = key, error = %e, "Failed to persist onboarding flag");
            false
        }
    }
}
