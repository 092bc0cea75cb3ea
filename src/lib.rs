pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod model;
pub mod utils;
pub mod web;

// re-exports
pub use app::{serve, App, AppState};
pub use error::{Error, Result};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Compact, colorful output for local development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(env_filter())
        .compact()
        .init();
}

/// Plain output with timestamps and targets, no ANSI escape codes.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(env_filter())
        .init();
}
