#[allow(clippy::module_inception)]
mod config;
mod dispatch_config;
mod location_config;

pub(crate) use {
    config::Config, dispatch_config::DispatchConfig, location_config::LocationConfig,
};

pub(crate) const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 15_000;

pub(crate) fn default_dispatch_timeout_ms() -> u64 {
    DEFAULT_DISPATCH_TIMEOUT_MS
}
