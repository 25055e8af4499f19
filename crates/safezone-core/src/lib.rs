//! SafeZone Core Library
//!
//! The SOS activation workflow: arm the control, hold to confirm, verify the
//! operator, capture audio evidence and a location fix, then dispatch an
//! alert to emergency contacts. Platform capabilities are injected through the
//! traits in [`collaborators`].
//!
//! # Example
//!
//! ```no_run
//! use safezone_core::{Collaborators, HoldStart, SosConfig, SosController};
//!
//! async fn press_and_hold(deps: Collaborators) {
//!     let controller = SosController::new(SosConfig::default(), deps);
//!
//!     controller.arm().await;
//!     assert_eq!(controller.begin_hold().await, HoldStart::Started);
//!
//!     // Releasing before the threshold would cancel:
//!     // controller.end_hold().await;
//!
//!     let mut updates = controller.subscribe();
//!     let _ = updates.wait_for(|s| s.finished_sessions == 1).await;
//! }
//! ```

mod audio;
pub mod collaborators;
mod error;
mod sos;

pub use {
    audio::MicrophoneRecorder,
    error::{Result as CoreResult, SosError},
    sos::{
        AbortReason, BiometricPolicy, Collaborators, HoldStart, SessionOutcome, SosConfig,
        SosController, SosSession, SosSnapshot, SosState,
    },
};

#[cfg(test)]
mod tests;
