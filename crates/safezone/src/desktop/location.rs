use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use safezone_core::{
    CoreResult, SosError,
    collaborators::{Coordinates, LocationProvider, Permission},
};

/// Reports the coordinate configured under `[location] fixed`.
///
/// With nothing configured the provider behaves like a refused permission.
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    fixed: Option<Coordinates>,
}

impl FixedLocationProvider {
    /// Provider for an optional fixed position.
    pub fn new(fixed: Option<Coordinates>) -> Self {
        Self { fixed }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> CoreResult<Permission> {
        Ok(match self.fixed {
            Some(_) => Permission::Granted,
            None => Permission::Denied,
        })
    }

    async fn current_fix(&self) -> CoreResult<Coordinates> {
        self.fixed.ok_or_else(|| SosError::LocationUnavailable {
            reason: "No fixed location configured".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
