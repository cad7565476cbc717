// Tracing initialization with a configurable log level.
use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Validate a log level name such as `info` or `debug`.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .with_context(|| format!("Given log level \"{level}\" was invalid"))
}

pub fn init_tracing(level: &str) -> Result<()> {
    let level = parse_level(level)?;

    // Prefer RUST_LOG from env, otherwise use the configured level.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()));

    // Logs go to stderr so command output on stdout stays clean.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
    Ok(())
}
