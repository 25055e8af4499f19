use async_trait::async_trait;

/// Operator-facing message emitted by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Recording has begun and the alert will follow.
    ActivationStarted,
    /// Microphone access was refused; nothing was recorded.
    MicrophoneDenied,
    /// Biometric confirmation is required but not available on this device.
    BiometricUnavailable,
    /// The recorder could not start.
    RecordingFailed {
        /// Underlying failure.
        reason: String,
    },
    /// The recorder could not be stopped; the alert goes out without audio.
    EvidenceLost {
        /// Underlying failure.
        reason: String,
    },
    /// The notification service accepted the alert.
    AlertDelivered {
        /// Message returned by the service.
        message: String,
    },
    /// The notification service rejected the alert or was unreachable.
    DispatchFailed {
        /// Message returned by the dispatcher.
        reason: String,
    },
}

impl Notice {
    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::MicrophoneDenied
                | Notice::BiometricUnavailable
                | Notice::RecordingFailed { .. }
                | Notice::EvidenceLost { .. }
                | Notice::DispatchFailed { .. }
        )
    }

    /// Short title suitable for a dialog or notification summary.
    pub fn title(&self) -> &'static str {
        match self {
            Notice::ActivationStarted => "SOS activated",
            Notice::MicrophoneDenied => "Microphone access denied",
            Notice::BiometricUnavailable => "Identity check unavailable",
            Notice::RecordingFailed { .. } => "Recording failed",
            Notice::EvidenceLost { .. } => "Audio evidence lost",
            Notice::AlertDelivered { .. } => "Alert sent",
            Notice::DispatchFailed { .. } => "Alert not delivered",
        }
    }

    /// Body text for the notice.
    pub fn body(&self) -> String {
        match self {
            Notice::ActivationStarted => {
                "Recording audio. Your emergency contacts will be alerted.".to_string()
            }
            Notice::MicrophoneDenied => {
                "Allow microphone access to record evidence during an SOS.".to_string()
            }
            Notice::BiometricUnavailable => {
                "This device cannot confirm your identity, so SOS was not activated.".to_string()
            }
            Notice::RecordingFailed { reason }
            | Notice::EvidenceLost { reason }
            | Notice::DispatchFailed { reason } => reason.clone(),
            Notice::AlertDelivered { message } => message.clone(),
        }
    }
}

/// Shows non-blocking, dismissible messages to the operator.
///
/// Delivery is best-effort: implementations log their own failures.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Present a notice.
    async fn notify(&self, notice: Notice);
}
