use crate::CoreResult;

use async_trait::async_trait;

/// Result of an identity confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricOutcome {
    /// The operator's identity was confirmed.
    Success,
    /// The prompt was answered but did not match.
    Failed,
    /// The operator dismissed the prompt.
    Cancelled,
}

/// Confirms the operator's identity before an irreversible action.
#[async_trait]
pub trait BiometricVerifier: Send + Sync {
    /// Whether biometric hardware is present AND something is enrolled.
    async fn has_capability(&self) -> CoreResult<bool>;

    /// Show a confirmation prompt with the given text.
    async fn confirm(&self, prompt: &str) -> CoreResult<BiometricOutcome>;
}
