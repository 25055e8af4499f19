//! Contracts for the platform capabilities the SOS workflow depends on.
//!
//! The workflow treats every collaborator as an opaque async capability.
//! Platform layers (mobile SDK bridges, the desktop companion, test fakes)
//! provide the implementations.

mod biometric;
mod contacts;
mod dispatcher;
mod location;
mod notifier;
mod recorder;
mod store;

pub use {
    biometric::{BiometricOutcome, BiometricVerifier},
    contacts::{ContactDirectory, EmergencyContact},
    dispatcher::{AlertDispatcher, AlertPayload, DispatchReceipt},
    location::{Coordinates, LocationProvider},
    notifier::{Notice, OperatorNotifier},
    recorder::{AudioArtifact, AudioRecorder, RecordingHandle, RecordingQuality},
    store::{FlagStore, flags},
};

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The operator allowed access.
    Granted,
    /// The operator refused access, or the capability is missing.
    Denied,
}

impl Permission {
    /// Returns true when access was granted.
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}
