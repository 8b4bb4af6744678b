//! Periodic air-quality refresh.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use aqi::{AqiEngine, AqiReport};
use chrono::{DateTime, Utc};

use crate::atmosphere::AtmosphereSampler;
use crate::context::Context;

/// An AQI report and the time its sample was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub report: AqiReport,
}

/// Shared handle to the most recent snapshot.
///
/// Cheap to clone; readers on other threads see each refresh as it lands.
#[derive(Debug, Clone, Default)]
pub struct LatestReport(Arc<RwLock<Option<Snapshot>>>);

impl LatestReport {
    pub fn get(&self) -> Option<Snapshot> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn publish(&self, snapshot: Snapshot) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}

/// Samples a source on an interval and keeps the latest AQI.
pub struct Monitor<S> {
    sampler: S,
    engine: AqiEngine,
    interval: Duration,
    latest: LatestReport,
}

impl<S: AtmosphereSampler> Monitor<S> {
    pub fn new(sampler: S, engine: AqiEngine, interval: Duration) -> Self {
        Monitor {
            sampler,
            engine,
            interval,
            latest: LatestReport::default(),
        }
    }

    /// Handle for reading the latest snapshot.
    pub fn latest(&self) -> LatestReport {
        self.latest.clone()
    }

    /// Take one sample, compute its AQI, and publish it.
    pub fn refresh(&mut self) -> Snapshot {
        let sample = self.sampler.sample();
        let report = sample.air_quality(&self.engine);
        match (report.aqi(), report.dominant(), report.category()) {
            (Some(aqi), Some(dominant), Some(category)) => tracing::info!(
                aqi,
                %dominant,
                %category,
                pollutants = report.sub_indices.len(),
                temperature = ?sample.temperature,
                relative_humidity = ?sample.relative_humidity,
                "air quality at {}",
                sample.timestamp
            ),
            _ => tracing::warn!(
                readings = sample.readings.len(),
                "no computable air quality at {}",
                sample.timestamp
            ),
        }

        let snapshot = Snapshot {
            timestamp: sample.timestamp,
            report,
        };
        self.latest.publish(snapshot.clone());
        snapshot
    }

    /// Refresh every interval until the context is cancelled.
    /// Returns the number of refreshes performed.
    pub fn run(&mut self, ctx: &Context) -> usize {
        let mut refreshes = 0;
        while !ctx.is_cancelled() {
            self.refresh();
            refreshes += 1;
            if ctx.wait_timeout(self.interval) {
                break;
            }
        }
        refreshes
    }
}
