//! Air-quality monitoring.
//!
//! Samples pollutant concentrations from a provider payload, turns them into
//! an EPA AQI with the [`aqi`] crate, and keeps the latest result for
//! whatever displays it.
//!
//! # Binaries
//! - `airwatch`: refreshes from `AIRWATCH_SOURCE` on an interval until SIGINT.
//! - `aqi-report`: prints the AQI report for one payload as JSON.

pub mod atmosphere;
pub mod config;
pub mod context;
pub mod monitor;
pub mod provider;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Filters with `RUST_LOG`, defaulting to `info`. Logs go to stderr so that
/// stdout stays free for program output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
