//! Daemon configuration, from the environment.

use std::path::PathBuf;
use std::time::Duration;

use aqi::{OutOfRange, Settings};

/// Default interval between refreshes.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("AIRWATCH_SOURCE must name a provider payload file")]
    MissingSource,
    #[error("AIRWATCH_INTERVAL_SECS must be a positive integer, got {0:?}")]
    InvalidInterval(String),
    #[error("AIRWATCH_OUT_OF_RANGE must be \"strict\" or \"extrapolate\", got {0:?}")]
    InvalidOutOfRange(String),
}

/// Configuration for the `airwatch` daemon.
///
/// | Env Var                  | Default  |
/// |--------------------------|----------|
/// | `AIRWATCH_SOURCE`        | required |
/// | `AIRWATCH_INTERVAL_SECS` | `60`     |
/// | `AIRWATCH_OUT_OF_RANGE`  | `strict` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Provider payload file, re-read on every refresh.
    pub source: PathBuf,
    pub interval: Duration,
    pub out_of_range: OutOfRange,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = lookup("AIRWATCH_SOURCE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingSource)?;

        let interval = match lookup("AIRWATCH_INTERVAL_SECS") {
            None => Duration::from_secs(DEFAULT_INTERVAL_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidInterval(raw)),
            },
        };

        let out_of_range = match lookup("AIRWATCH_OUT_OF_RANGE") {
            None => OutOfRange::default(),
            Some(raw) => parse_out_of_range(&raw).ok_or(ConfigError::InvalidOutOfRange(raw))?,
        };

        Ok(Config {
            source,
            interval,
            out_of_range,
        })
    }

    pub fn engine_settings(&self) -> Settings {
        Settings::default().with_out_of_range(self.out_of_range)
    }
}

/// Parse an out-of-range policy name.
pub fn parse_out_of_range(raw: &str) -> Option<OutOfRange> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(OutOfRange::Strict),
        "extrapolate" | "extrapolated" => Some(OutOfRange::Extrapolate),
        _ => None,
    }
}
