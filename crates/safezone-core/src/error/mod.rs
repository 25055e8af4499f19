use error_location::ErrorLocation;
use thiserror::Error;

/// SOS workflow and collaborator errors with source location tracking.
#[derive(Error, Debug)]
pub enum SosError {
    /// Identity confirmation failed or was cancelled by the operator.
    #[error("Biometric confirmation denied {location}")]
    BiometricDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Identity confirmation is required but the device cannot perform it.
    #[error("Biometric confirmation required but unavailable {location}")]
    BiometricUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Microphone access was refused.
    #[error("Microphone permission denied {location}")]
    MicrophonePermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder could not start a session.
    #[error("Recording failed to start: {reason} {location}")]
    RecordingStartFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder could not stop or yield its artifact.
    #[error("Recording failed to stop: {reason} {location}")]
    RecordingStopFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Location access was refused.
    #[error("Location permission denied {location}")]
    LocationPermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No coordinate fix could be obtained.
    #[error("Location unavailable: {reason} {location}")]
    LocationUnavailable {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The alert could not be delivered to the notification service.
    #[error("Alert dispatch failed: {reason} {location}")]
    DispatchFailed {
        /// Message reported by the dispatcher.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio artifact could not be encoded.
    #[error("Encoding error: {reason} {location}")]
    EncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Flag store read or write failed.
    #[error("Flag store error: {reason} {location}")]
    StoreError {
        /// Description of the store error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SosError {
    /// Operator-facing description, without the source location.
    pub fn user_message(&self) -> String {
        match self {
            SosError::BiometricDenied { .. } => "Identity confirmation was not granted".to_string(),
            SosError::BiometricUnavailable { .. } => {
                "Identity confirmation is not available on this device".to_string()
            }
            SosError::MicrophonePermissionDenied { .. } => {
                "Microphone access was denied".to_string()
            }
            SosError::LocationPermissionDenied { .. } => "Location access was denied".to_string(),
            SosError::RecordingStartFailed { reason, .. }
            | SosError::RecordingStopFailed { reason, .. }
            | SosError::LocationUnavailable { reason, .. }
            | SosError::DispatchFailed { reason, .. }
            | SosError::DeviceError { reason, .. }
            | SosError::EncodingError { reason, .. }
            | SosError::StoreError { reason, .. } => reason.clone(),
        }
    }
}

/// Result type alias using [`SosError`].
pub type Result<T> = std::result::Result<T, SosError>;
