use crate::{CoreResult, collaborators::Coordinates};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A person the operator wants alerted. Read-only to the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Phone number in international format.
    pub phone: String,
    /// Last known latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Last known longitude.
    #[serde(default)]
    pub lng: Option<f64>,
    /// Pinned by the operator.
    #[serde(default)]
    pub favorite: bool,
}

impl EmergencyContact {
    /// Last known position, if both coordinates are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }
}

/// Supplies the operator's emergency contacts.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// All contacts, favorites first.
    async fn emergency_contacts(&self) -> CoreResult<Vec<EmergencyContact>>;
}
