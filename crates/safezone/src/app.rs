use crate::{AppCommand, AppResult, config::Config};

use std::time::Duration;

use safezone_core::{HoldStart, SosController, SosState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Slack on top of the worst-case session length when draining at exit.
const DRAIN_MARGIN: Duration = Duration::from_secs(2);

/// Main application state.
///
/// Runs on the async runtime thread. The main thread keeps the event loop
/// and exits once [`App::run`] returns.
pub struct App {
    pub(crate) controller: SosController,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) drain_timeout: Duration,
}

impl App {
    /// Longest a running session can take to reach dispatch and finish.
    pub(crate) fn drain_budget(config: &Config) -> Duration {
        config.sos.capture_window() + config.dispatch.timeout() + DRAIN_MARGIN
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("SafeZone starting");

        let mut snapshots = self.controller.subscribe();
        let mut last_state = snapshots.borrow().state;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        info!("Command channel closed, shutting down");
                        break;
                    };
                    match cmd {
                        AppCommand::BeginHold => self.begin_hold().await,
                        AppCommand::EndHold => {
                            if self.controller.end_hold().await {
                                info!("SOS key released early, activation cancelled");
                            }
                        }
                        AppCommand::ToggleArm => {
                            let armed = self.controller.toggle_armed().await;
                            info!(armed, "SOS armed flag toggled");
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                changed = snapshots.changed() => {
                    if changed.is_err() {
                        warn!("Controller snapshot channel closed");
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if snapshot.state != last_state {
                        info!(
                            from = ?last_state,
                            to = ?snapshot.state,
                            session_id = ?snapshot.session_id,
                            "SOS state changed"
                        );
                        last_state = snapshot.state;
                    }
                }
            }
        }

        self.drain().await;

        let _ = self.shutdown_tx.send(true);
        info!("SafeZone shut down successfully");

        Ok(())
    }

    async fn begin_hold(&self) {
        match self.controller.begin_hold().await {
            HoldStart::Started => {
                let hold = self.controller.config().confirm_hold();
                info!(hold_ms = hold.as_millis(), "Hold started, keep the SOS key down");
            }
            HoldStart::NotArmed => info!("SOS is not armed, press CTRL+SHIFT+A to arm"),
            HoldStart::Busy => debug!("SOS already in progress, hold ignored"),
        }
    }

    /// Stop the controller and give a running session time to dispatch.
    #[instrument(skip(self))]
    async fn drain(&self) {
        self.controller.shutdown().await;

        let mut updates = self.controller.subscribe();
        let settled = tokio::time::timeout(self.drain_timeout, async {
            updates
                .wait_for(|s| !s.state.is_active() && s.state != SosState::Confirming)
                .await
                .map(|_| ())
        })
        .await;

        match settled {
            Ok(Ok(())) => debug!("No SOS session running"),
            Ok(Err(e)) => warn!(error = %e, "Controller dropped while draining"),
            Err(_) => warn!(
                timeout_ms = self.drain_timeout.as_millis(),
                "SOS session still running at exit"
            ),
        }
    }
}
