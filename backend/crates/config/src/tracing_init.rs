use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, then `LOG_LEVEL`, then `default_level`.
/// Calling this twice is harmless: the second install is skipped.
pub fn init_tracing(default_level: &str) {
    let installed = fmt()
        .with_env_filter(resolve_filter(default_level))
        .with_target(true)
        .try_init();

    if installed.is_err() {
        eprintln!("tracing subscriber already installed, keeping the existing one");
    }
}

fn resolve_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}
