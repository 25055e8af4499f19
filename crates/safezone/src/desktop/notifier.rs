use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use safezone_core::collaborators::{Notice, OperatorNotifier};
use tracing::{debug, warn};

const APP_NAME: &str = "SafeZone";
const NOTICE_TIMEOUT_MS: u32 = 8_000;

/// Shows workflow notices as desktop notifications.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    /// Show a notification outside the workflow (welcome, shutdown).
    pub async fn show(&self, summary: &str, body: &str) {
        let summary = summary.to_string();
        let body = body.to_string();

        // Some backends block on a D-Bus round trip.
        let shown = tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(APP_NAME)
                .summary(&summary)
                .body(&body)
                .timeout(Timeout::Milliseconds(NOTICE_TIMEOUT_MS))
                .show()
                .map(|_| ())
        })
        .await;

        match shown {
            Ok(Ok(())) => debug!("Notification shown"),
            Ok(Err(e)) => warn!(error = %e, "Failed to show notification"),
            Err(e) => warn!(error = ?e, "Notification task panicked"),
        }
    }
}

#[async_trait]
impl OperatorNotifier for DesktopNotifier {
    async fn notify(&self, notice: Notice) {
        if notice.is_error() {
            warn!(notice = ?notice, "SOS notice");
        } else {
            debug!(notice = ?notice, "SOS notice");
        }

        self.show(notice.title(), &notice.body()).await;
    }
}
