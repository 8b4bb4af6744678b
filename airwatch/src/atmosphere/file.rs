//! Sample air quality from a provider payload on disk.
//!
//! Whatever fetches from the provider writes its latest response to a file;
//! this sampler re-reads it every time it is sampled.

use std::path::PathBuf;

use chrono::Utc;

use super::{AtmosphereSample, AtmosphereSampler};
use crate::provider::{self, Observation};

pub struct JsonFileSampler {
    path: PathBuf,
}

impl JsonFileSampler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSampler { path: path.into() }
    }
}

impl AtmosphereSampler for JsonFileSampler {
    fn sample(&mut self) -> AtmosphereSample {
        let observation = match provider::read_file(&self.path) {
            Ok(observation) => observation,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "no sample: {}", e);
                Observation::default()
            }
        };
        AtmosphereSample {
            timestamp: Utc::now(),
            temperature: observation.temperature,
            relative_humidity: observation.relative_humidity,
            readings: observation.readings,
        }
    }
}
