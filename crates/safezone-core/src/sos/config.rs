use crate::collaborators::RecordingQuality;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_CONFIRM_HOLD_MS: u64 = 2_000;
pub(crate) const DEFAULT_CAPTURE_WINDOW_MS: u64 = 10_000;
pub(crate) const DEFAULT_BIOMETRIC_PROMPT: &str = "Confirm SOS activation";

fn default_confirm_hold_ms() -> u64 {
    DEFAULT_CONFIRM_HOLD_MS
}

fn default_capture_window_ms() -> u64 {
    DEFAULT_CAPTURE_WINDOW_MS
}

fn default_biometric_prompt() -> String {
    DEFAULT_BIOMETRIC_PROMPT.to_string()
}

/// What to do when the device cannot confirm the operator's identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BiometricPolicy {
    /// Missing hardware or enrollment skips confirmation and activation
    /// proceeds. This is a security-relevant choice: anyone holding an armed
    /// device without biometrics can raise an alert.
    #[default]
    FailOpen,
    /// Missing hardware or enrollment aborts activation.
    FailClosed,
}

/// Timing and policy knobs for the SOS workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosConfig {
    /// How long the control must be held before activation.
    #[serde(default = "default_confirm_hold_ms")]
    pub confirm_hold_ms: u64,

    /// How long audio is recorded before the alert is dispatched.
    #[serde(default = "default_capture_window_ms")]
    pub capture_window_ms: u64,

    /// Behavior when biometrics are unavailable.
    #[serde(default)]
    pub biometric_policy: BiometricPolicy,

    /// Preset passed to the recorder.
    #[serde(default)]
    pub recording_quality: RecordingQuality,

    /// Text shown in the identity confirmation prompt.
    #[serde(default = "default_biometric_prompt")]
    pub biometric_prompt: String,
}

impl SosConfig {
    /// Hold-to-confirm threshold.
    pub fn confirm_hold(&self) -> Duration {
        Duration::from_millis(self.confirm_hold_ms)
    }

    /// Capture window length.
    pub fn capture_window(&self) -> Duration {
        Duration::from_millis(self.capture_window_ms)
    }
}

impl Default for SosConfig {
    fn default() -> Self {
        Self {
            confirm_hold_ms: DEFAULT_CONFIRM_HOLD_MS,
            capture_window_ms: DEFAULT_CAPTURE_WINDOW_MS,
            biometric_policy: BiometricPolicy::default(),
            recording_quality: RecordingQuality::default(),
            biometric_prompt: default_biometric_prompt(),
        }
    }
}
