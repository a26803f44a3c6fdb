use anyhow::{anyhow, Result};

/// Environment variable holding the tracing filter, e.g. `debug` or
/// `excelbill=debug,warn`.
pub const LOG_ENV: &str = "EXCELBILL_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let env_filter =
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to set global tracing subscriber: {err}"))
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() -> Result<()> {
    dioxus::logger::init(tracing::Level::INFO)
        .map_err(|err| anyhow!("failed to set global tracing subscriber: {err}"))
}
