mod activation;
mod config;
mod controller;
mod session;
mod state;

pub use {
    config::{BiometricPolicy, SosConfig},
    controller::{Collaborators, SosController},
    session::SosSession,
    state::{AbortReason, HoldStart, SessionOutcome, SosSnapshot, SosState},
};
