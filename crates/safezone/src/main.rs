//! SafeZone: hold-to-activate SOS alerts with global hotkey control.

mod app;
mod app_command;
mod atomic_file;
mod config;
mod desktop;
mod error;
mod flag_store;
mod hold_key_state;
mod hotkey_handler;
mod main_command;
mod onboarding;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    flag_store::FileFlagStore,
    hold_key_state::HoldKeyState,
    hotkey_handler::{HotkeyBindings, HotkeyHandler},
    main_command::MainCommand,
};

use crate::{
    config::Config,
    desktop::{
        DemoAlertDispatcher, DemoContacts, DesktopNotifier, FixedLocationProvider,
        HttpAlertDispatcher, NoBiometrics,
    },
};

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use safezone_core::{
    Collaborators, MicrophoneRecorder, SosController,
    collaborators::{AlertDispatcher, LocationProvider},
};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("safezone=debug,safezone_core=debug")
        .init();

    let event_loop = EventLoopBuilder::<MainCommand>::with_user_event().build();
    let main_proxy = event_loop.create_proxy();

    // Persists across event loop iterations; dropping it unregisters the hotkeys.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(MainCommand::Shutdown) => {
                *control_flow = ControlFlow::ExitWithCode(0);
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Register on the main thread: tao's event loop pumps the
                // messages needed for hotkey delivery.
                let (manager, bindings) = match HotkeyHandler::register_hotkeys() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let main_proxy = main_proxy.clone();

                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(run_runtime(config, bindings));

                    request_exit(&main_proxy);
                });
            }
            _ => {}
        }

        let _ = &hotkey_manager;
    });
}

/// Everything that lives on the tokio runtime thread.
async fn run_runtime(config: Config, bindings: HotkeyBindings) {
    let notifier = Arc::new(DesktopNotifier);
    let recorder = Arc::new(MicrophoneRecorder::new());
    let location: Arc<dyn LocationProvider> =
        Arc::new(FixedLocationProvider::new(config.location.fixed));

    let dispatcher: Arc<dyn AlertDispatcher> = match &config.dispatch.endpoint {
        Some(endpoint) => match HttpAlertDispatcher::new(endpoint, &config.dispatch) {
            Ok(dispatcher) => {
                info!(endpoint = %endpoint, "Alerts will be posted to the configured service");
                Arc::new(dispatcher)
            }
            Err(e) => {
                error!(error = ?e, "Failed to create alert dispatcher");
                return;
            }
        },
        None => {
            warn!("No dispatch endpoint configured, running in demo mode");
            Arc::new(DemoAlertDispatcher::new(Arc::new(DemoContacts)))
        }
    };

    show_onboarding(&notifier, recorder.as_ref(), location.as_ref()).await;

    let controller = SosController::new(
        config.sos.clone(),
        Collaborators {
            biometric: Arc::new(NoBiometrics),
            location,
            recorder,
            dispatcher,
            notifier,
        },
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let hotkey_handler = HotkeyHandler::new(bindings, command_tx);

    let app = App {
        controller,
        command_rx,
        shutdown_tx,
        drain_timeout: App::drain_budget(&config),
    };

    tokio::join!(
        async {
            if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                error!(error = ?e, "Hotkey handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );
}

async fn show_onboarding(
    notifier: &DesktopNotifier,
    recorder: &MicrophoneRecorder,
    location: &dyn LocationProvider,
) {
    let flags_path = match Config::config_dir() {
        Ok(dir) => dir.join("flags.toml"),
        Err(e) => {
            warn!(error = ?e, "No config directory, skipping onboarding");
            return;
        }
    };

    let mut store = match FileFlagStore::open(&flags_path) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = ?e, "Flag store unavailable, skipping onboarding");
            return;
        }
    };

    for step in onboarding::first_launch(&mut store, recorder, location).await {
        notifier.show(step.title(), step.body()).await;
    }
}

fn request_exit(proxy: &EventLoopProxy<MainCommand>) {
    if let Err(e) = proxy.send_event(MainCommand::Shutdown) {
        error!(error = ?e, "Failed to signal main thread");
    }
}
