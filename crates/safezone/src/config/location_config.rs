use safezone_core::collaborators::Coordinates;

use serde::{Deserialize, Serialize};

/// Location source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed coordinate reported for this machine (None = no location).
    #[serde(default)]
    pub fixed: Option<Coordinates>,
}
