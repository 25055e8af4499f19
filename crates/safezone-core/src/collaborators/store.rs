use crate::CoreResult;

/// Well-known flag keys.
pub mod flags {
    /// Set once the operator has seen the onboarding notice.
    pub const ONBOARDING_SEEN: &str = "onboarding_seen";
    /// Set once microphone access has been requested.
    pub const MICROPHONE_PROMPTED: &str = "microphone_prompted";
    /// Set once location access has been requested.
    pub const LOCATION_PROMPTED: &str = "location_prompted";
}

/// Local persistent key-value store for onboarding and permission flags.
///
/// The SOS workflow never writes to it; the host app does.
pub trait FlagStore: Send + Sync {
    /// Read a flag. Missing keys read as `false`.
    fn get_flag(&self, key: &str) -> bool;

    /// Write a flag durably.
    fn set_flag(&mut self, key: &str, value: bool) -> CoreResult<()>;
}
