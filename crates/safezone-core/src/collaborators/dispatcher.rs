use crate::{CoreResult, collaborators::Coordinates};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert submitted to the notification service.
///
/// Serializes to camelCase JSON; absent coordinates are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    /// Base64 (standard alphabet, padded) of the audio artifact.
    pub audio_base64: String,
    /// MIME type of the encoded audio.
    pub mime_type: String,
    /// Length of the capture window in whole seconds.
    pub duration_seconds: u64,
    /// When recording began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Latitude of the location fix, when one was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude of the location fix, when one was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl AlertPayload {
    /// Location carried by the payload, if both coordinates are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }
}

/// Acknowledgement returned by the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Human-readable confirmation.
    pub message: String,
}

/// Transmits alerts to the remote notification service.
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// Submit one alert. Implementations must not retry on their own.
    async fn submit(&self, payload: &AlertPayload) -> CoreResult<DispatchReceipt>;
}
