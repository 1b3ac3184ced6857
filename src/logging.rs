use anishelf_core::config::{AppConfig, LogLevel};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

pub type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Installs the global subscriber; `RUST_LOG` wins over `config.log_level`.
///
/// The returned handle lets the settings page change the level later.
pub fn init_tracing(config: &AppConfig) -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .try_init();
    match installed {
        Ok(()) => info!(level = %config.log_level, "Logging initialized"),
        Err(err) => warn!("Tracing subscriber already installed: {err}"),
    }
    handle
}

pub fn set_log_level(handle: &ReloadHandle, level: LogLevel) {
    let parsed = EnvFilter::new(level.as_filter_str());
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level: {err}");
    } else {
        info!(%level, "Applied log level");
    }
}
