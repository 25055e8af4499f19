//! Global hotkey handler for the SOS hold gesture.
//!
//! Registers the hold, arm and quit hotkeys and turns raw key events into
//! [`AppCommand`]s. Uses async channels to communicate with the main
//! application.

use crate::{AppCommand, AppError, AppResult, HoldKeyState};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Ids of the registered hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBindings {
    /// Hold to activate SOS.
    pub hold: u32,
    /// Toggle armed.
    pub arm: u32,
    /// Quit the application.
    pub quit: u32,
}

/// Global hotkey handler tracking the hold key.
pub struct HotkeyHandler {
    bindings: HotkeyBindings,
    state: Mutex<HoldKeyState>,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register CTRL+SHIFT+S (hold), CTRL+SHIFT+A (arm) and CTRL+SHIFT+Q (quit).
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkeys to remain registered.
    #[track_caller]
    #[instrument]
    pub fn register_hotkeys() -> AppResult<(GlobalHotKeyManager, HotkeyBindings)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let modifiers = Some(Modifiers::CONTROL | Modifiers::SHIFT);
        let hold = HotKey::new(modifiers, Code::KeyS);
        let arm = HotKey::new(modifiers, Code::KeyA);
        let quit = HotKey::new(modifiers, Code::KeyQ);

        for (hotkey, label) in [
            (hold, "CTRL+SHIFT+S"),
            (arm, "CTRL+SHIFT+A"),
            (quit, "CTRL+SHIFT+Q"),
        ] {
            manager
                .register(hotkey)
                .map_err(|e| AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to register {}: {}", label, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        info!(
            hold = "CTRL+SHIFT+S",
            arm = "CTRL+SHIFT+A",
            quit = "CTRL+SHIFT+Q",
            "Global hotkeys registered"
        );

        Ok((
            manager,
            HotkeyBindings {
                hold: hold.id(),
                arm: arm.id(),
                quit: quit.id(),
            },
        ))
    }

    /// Create a handler for previously registered hotkeys.
    ///
    /// The bindings should come from [`HotkeyHandler::register_hotkeys`].
    /// This struct is `Send` and can live on any thread: it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(bindings: HotkeyBindings, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            bindings,
            state: Mutex::new(HoldKeyState::Released),
            command_tx,
        }
    }

    /// Run the hotkey handler event loop until a shutdown signal arrives.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // One blocking task forwards hotkey events. It exits on the first
        // blocking_send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if let Err(e) = self.handle_event(event.id, event.state).await {
                        warn!(error = ?e, "Failed to handle hotkey event");
                    }
                }
            }
        }

        drop(event_rx);

        // The forwarder may still be parked in recv(); it is cleaned up on
        // process exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Map one raw hotkey event to a command.
    ///
    /// Key auto-repeat delivers repeated `Pressed` events while the hold key
    /// is down; only the first one begins a hold.
    #[instrument(skip(self))]
    pub(crate) async fn handle_event(&self, id: u32, key_state: HotKeyState) -> AppResult<()> {
        if id == self.bindings.hold {
            return self.handle_hold_key(key_state).await;
        }

        if key_state != HotKeyState::Pressed {
            return Ok(());
        }

        if id == self.bindings.arm {
            self.send(AppCommand::ToggleArm).await
        } else if id == self.bindings.quit {
            self.send(AppCommand::Shutdown).await
        } else {
            debug!(id, "Ignoring unknown hotkey");
            Ok(())
        }
    }

    async fn handle_hold_key(&self, key_state: HotKeyState) -> AppResult<()> {
        let mut state = self.state.lock().await;

        match (*state, key_state) {
            (HoldKeyState::Released, HotKeyState::Pressed) => {
                // Send FIRST: if the channel is closed the key stays Released
                // and the next press retries.
                self.send(AppCommand::BeginHold).await?;
                *state = HoldKeyState::Held {
                    since: Instant::now(),
                };
                debug!("SOS key down");
            }
            (HoldKeyState::Held { since }, HotKeyState::Released) => {
                self.send(AppCommand::EndHold).await?;
                *state = HoldKeyState::Released;
                debug!(held_ms = since.elapsed().as_millis(), "SOS key up");
            }
            _ => {}
        }

        Ok(())
    }

    /// Current hold key state.
    #[cfg(test)]
    pub(crate) async fn hold_key_state(&self) -> HoldKeyState {
        *self.state.lock().await
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
