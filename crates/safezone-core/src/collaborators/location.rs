use crate::{CoreResult, collaborators::Permission};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single latitude/longitude fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Yields a best-effort coordinate on demand.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask the operator for foreground location access.
    async fn request_permission(&self) -> CoreResult<Permission>;

    /// Fetch one coordinate fix.
    async fn current_fix(&self) -> CoreResult<Coordinates>;
}
