use async_trait::async_trait;
use safezone_core::{
    CoreResult,
    collaborators::{BiometricOutcome, BiometricVerifier},
};
use tracing::debug;

/// Desktop hosts have no biometric sensor the workflow can drive.
///
/// The configured policy decides whether activation proceeds without it.
#[derive(Debug, Default)]
pub struct NoBiometrics;

#[async_trait]
impl BiometricVerifier for NoBiometrics {
    async fn has_capability(&self) -> CoreResult<bool> {
        Ok(false)
    }

    async fn confirm(&self, prompt: &str) -> CoreResult<BiometricOutcome> {
        debug!(prompt, "Biometric prompt requested on a host without a sensor");
        Ok(BiometricOutcome::Failed)
    }
}
