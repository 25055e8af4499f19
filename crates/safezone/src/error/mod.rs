use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures of the desktop shell around the SOS controller.
///
/// Workflow failures never surface here: the controller reports them as
/// operator notices. Every variant records where it was raised.
#[derive(Error, Debug)]
pub enum AppError {
    /// The SOS or arm hotkey could not be claimed from the OS.
    #[error("Hotkey registration failed: {reason} {location}")]
    HotkeyRegistrationFailed {
        /// Why the OS refused the binding.
        reason: String,
        /// Where the registration was attempted.
        location: ErrorLocation,
    },

    /// A hold or arm command could not reach the app loop.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// The command that was dropped.
        message: String,
        /// Where the send was attempted.
        location: ErrorLocation,
    },

    /// config.toml could not be read or written, or holds values the
    /// workflow cannot run with, such as a zero capture window.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Which setting or file operation failed.
        reason: String,
        /// Where the check failed.
        location: ErrorLocation,
    },

    /// The config directory could not be created.
    #[error("IO error: {source} {location}")]
    IoError {
        /// Filesystem error.
        #[source]
        source: std::io::Error,
        /// Where the operation was attempted.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
