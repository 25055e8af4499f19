use crate::config::{DEFAULT_DISPATCH_TIMEOUT_MS, default_dispatch_timeout_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Alert dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Notification service URL (None = demo mode, nothing leaves the machine).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token sent with each alert.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Request timeout for a single submission.
    #[serde(default = "default_dispatch_timeout_ms")]
    pub timeout_ms: u64,
}

impl DispatchConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            auth_token: None,
            timeout_ms: DEFAULT_DISPATCH_TIMEOUT_MS,
        }
    }
}
