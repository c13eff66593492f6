use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `ECHOBACK_LOG=echoback=debug`.
pub const LOG_ENV: &str = "ECHOBACK_LOG";

/// Installs a `tracing` subscriber that writes through the test harness's
/// captured output.
///
/// The filter is read from [`LOG_ENV`], then `RUST_LOG`, then defaults to
/// `warn`. Only the first call in a process has an effect.
pub fn init_test_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // another test may have won the race to install the global subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init();
}
