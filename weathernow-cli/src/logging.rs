use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter, e.g. `weathernow_core=debug`.
pub const LOG_ENV: &str = "WEATHERNOW_LOG";

/// Initialize logging to stderr so stdout stays clean for answers.
pub fn init(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
