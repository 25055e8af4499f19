//! Desktop implementations of the SOS workflow collaborators.

mod biometric;
mod contacts;
mod dispatcher;
mod location;
mod notifier;

pub(crate) use {
    biometric::NoBiometrics,
    contacts::DemoContacts,
    dispatcher::{DEMO_RECEIPT_MESSAGE, DemoAlertDispatcher, HttpAlertDispatcher},
    location::FixedLocationProvider,
    notifier::DesktopNotifier,
};
