use crate::config::Config;
use crate::workspace::ViewState;
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    info!(
        "Configuration: api={}, timeout={}s, logo_width={}mm",
        config.api_base_url(),
        config.timeout_duration().as_secs(),
        config.logo_width()
    );
    debug!(
        "Sync indicator window: {}ms",
        config.sync_indicator_duration().as_millis()
    );
}

/// Log a load being issued
pub fn log_load_started(generation: u64, property_id: Option<&str>, manual: bool) {
    let kind = if manual { "manual refresh" } else { "load" };
    info!(
        "Dashboard {kind} #{generation} for {}",
        property_id.unwrap_or("default property")
    );
}

/// Log the state a load settled in
pub fn log_load_outcome(generation: u64, state: &ViewState) {
    match state {
        ViewState::Error(message) => warn!("Load #{generation} failed: {message}"),
        ViewState::SessionExpired => warn!("Load #{generation}: session expired"),
        other => info!("Load #{generation} -> {other}"),
    }
}

/// Log a result dropped because the selection moved on
pub fn log_stale_result_discarded(
    generation: u64,
    requested: Option<&str>,
    current: Option<&str>,
) {
    debug!(
        "Discarding stale load #{generation} (requested {:?}, current {:?})",
        requested, current
    );
}

/// Log a written export
pub fn log_export(filename: &str, size: usize, destination: Option<&Path>) {
    match destination {
        Some(path) => info!("Exported {filename} ({size} bytes) to {}", path.display()),
        None => info!("Exported {filename} ({size} bytes)"),
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}
