use crate::{AppError, AppResult, config::DispatchConfig};

use std::{panic::Location, sync::Arc};

use async_trait::async_trait;
use error_location::ErrorLocation;
use safezone_core::{
    CoreResult, SosError,
    collaborators::{AlertDispatcher, AlertPayload, ContactDirectory, DispatchReceipt},
};
use tracing::{info, instrument, warn};

/// Receipt returned when no notification service is configured.
pub const DEMO_RECEIPT_MESSAGE: &str = "SOS alert recorded in demo mode. A live build would \
     deliver it to your contacts and guardians.";

const FALLBACK_RECEIPT_MESSAGE: &str = "Alert delivered";

/// Posts alerts as JSON to the configured notification service.
#[derive(Debug, Clone)]
pub struct HttpAlertDispatcher {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpAlertDispatcher {
    /// Build a dispatcher for `endpoint` using the timeout and token from
    /// `config`.
    #[track_caller]
    pub fn new(endpoint: &str, config: &DispatchConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            auth_token: config.auth_token.clone(),
        })
    }
}

#[async_trait]
impl AlertDispatcher for HttpAlertDispatcher {
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn submit(&self, payload: &AlertPayload) -> CoreResult<DispatchReceipt> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SosError::DispatchFailed {
                reason: format!("Could not reach the alert service: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SosError::DispatchFailed {
                reason: format!("Alert service returned {}: {}", status, body.trim()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // 2xx means delivered even if the body is not a receipt.
        let receipt = match response.json::<DispatchReceipt>().await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Alert accepted but receipt body was unreadable");
                DispatchReceipt {
                    message: FALLBACK_RECEIPT_MESSAGE.to_string(),
                }
            }
        };

        info!(status = %status, "Alert accepted by service");

        Ok(receipt)
    }
}

/// Logs the alert and the contacts it would reach, then reports success.
pub struct DemoAlertDispatcher {
    contacts: Arc<dyn ContactDirectory>,
}

impl DemoAlertDispatcher {
    /// Demo dispatcher listing recipients from `contacts`.
    pub fn new(contacts: Arc<dyn ContactDirectory>) -> Self {
        Self { contacts }
    }
}

#[async_trait]
impl AlertDispatcher for DemoAlertDispatcher {
    #[instrument(skip(self, payload))]
    async fn submit(&self, payload: &AlertPayload) -> CoreResult<DispatchReceipt> {
        match self.contacts.emergency_contacts().await {
            Ok(contacts) => {
                for contact in &contacts {
                    info!(
                        contact = %contact.name,
                        phone = %contact.phone,
                        favorite = contact.favorite,
                        "Demo mode: would alert contact"
                    );
                }
            }
            Err(e) => warn!(error = %e, "Demo mode: contact list unavailable"),
        }

        info!(
            audio_bytes_b64 = payload.audio_base64.len(),
            mime_type = %payload.mime_type,
            duration_seconds = payload.duration_seconds,
            location = ?payload.coordinates(),
            "Demo mode: alert recorded locally"
        );

        Ok(DispatchReceipt {
            message: DEMO_RECEIPT_MESSAGE.to_string(),
        })
    }
}
