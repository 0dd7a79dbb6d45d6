use tracing_subscriber::EnvFilter;

/// Environment variable holding the launcher's log filter directives.
pub const LOG_ENV: &str = "WAHU_LAUNCHER_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber for the launcher's own diagnostics.
///
/// Stdout belongs to the module, so nothing is ever written there. Calling
/// this twice is harmless; the second subscriber is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
