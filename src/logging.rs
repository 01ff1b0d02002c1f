//! Tracing subscriber setup for the CLI and API server.

use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "FIXTURE_WATTAGE_LOG";

/// Installs a stderr `fmt` subscriber.
///
/// The filter comes from [`LOG_ENV`], then `RUST_LOG`, then `default_level`
/// (e.g. `"warn"` or `"fixture_wattage=debug"`). Calling this again after a
/// subscriber is installed does nothing.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
