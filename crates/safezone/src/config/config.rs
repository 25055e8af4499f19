//! Configuration management for safezone.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    atomic_file::write_atomic,
    config::{DispatchConfig, LocationConfig},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use safezone_core::SosConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workflow timing and policy.
    #[serde(default)]
    pub sos: SosConfig,
    /// Location source.
    #[serde(default)]
    pub location: LocationConfig,
    /// Notification service.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating the
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load and validate configuration from `path`, writing defaults there
    /// when the file does not exist yet.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using the atomic write pattern.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(path, contents.as_bytes()).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to write config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Reject values the workflow cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        if self.sos.confirm_hold_ms == 0 {
            return Err(config_error("sos.confirm_hold_ms must be greater than zero"));
        }

        if self.sos.capture_window_ms == 0 {
            return Err(config_error(
                "sos.capture_window_ms must be greater than zero",
            ));
        }

        if self.dispatch.timeout_ms == 0 {
            return Err(config_error("dispatch.timeout_ms must be greater than zero"));
        }

        if let Some(fixed) = self.location.fixed {
            if !(-90.0..=90.0).contains(&fixed.lat) || !(-180.0..=180.0).contains(&fixed.lng) {
                return Err(config_error(&format!(
                    "location.fixed is out of range: {}",
                    fixed
                )));
            }
        }

        if let Some(endpoint) = &self.dispatch.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(config_error(&format!(
                    "dispatch.endpoint must be an http(s) URL, got {:?}",
                    endpoint
                )));
            }
        }

        Ok(())
    }

    /// Directory holding config.toml and the flag store.
    #[track_caller]
    pub fn config_dir() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "safezone", "SafeZone").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.to_path_buf())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[track_caller]
fn config_error(reason: &str) -> AppError {
    AppError::ConfigError {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
