use std::time::Instant;

/// Physical state of the SOS hold key as seen by the hotkey handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldKeyState {
    /// Key is up.
    Released,
    /// Key is down.
    Held {
        /// When the press was first seen.
        since: Instant,
    },
}
