/// Commands sent from the hotkey handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// The SOS key went down.
    BeginHold,
    /// The SOS key was released.
    EndHold,
    /// Flip the armed flag.
    ToggleArm,
    /// Request application shutdown.
    Shutdown,
}
