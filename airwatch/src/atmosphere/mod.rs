//! Types for surfacing atmospheric data.

use aqi::{AqiEngine, AqiReport, Readings};
use chrono::{DateTime, Utc};

mod file;

pub use file::JsonFileSampler;

/// A sample of local air quality.
///
/// For instance, from a provider such as
/// [OpenAQ](https://docs.openaq.org/) or
/// [Open-Meteo](https://open-meteo.com/en/docs/air-quality-api),
/// or from a local particulate sensor.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct AtmosphereSample {
    /// Time at which the data in this sample was acquired.
    pub timestamp: DateTime<Utc>,

    /// Temperature in degrees Celsius.
    pub temperature: Option<f32>,

    /// Relative humidity as a percentage (i.e. range 0.0 to 100.0).
    pub relative_humidity: Option<f32>,

    /// Pollutant concentrations, each in its pollutant's table unit.
    pub readings: Readings,
}

impl AtmosphereSample {
    /// Compute the AQI for this sample.
    pub fn air_quality(&self, engine: &AqiEngine) -> AqiReport {
        engine.compute(&self.readings)
    }
}

/// A type that can get local atmospheric conditions.
pub trait AtmosphereSampler {
    /// Get a current / latest sample of atmospheric conditions.
    ///
    /// While this will always return _an_ AtmosphereSample,
    /// it may return stale or partial data.
    fn sample(&mut self) -> AtmosphereSample;
}

/// The nullary AtmosphereSampler: provides no data.
pub struct NullAtmosphereSampler {}

impl AtmosphereSampler for NullAtmosphereSampler {
    fn sample(&mut self) -> AtmosphereSample {
        AtmosphereSample {
            timestamp: Utc::now(),
            ..Default::default()
        }
    }
}

/// Fake atmosphere sampler: repeatedly provides the indicated sample,
/// stamped with the current time.
pub struct FakeAtmosphereSampler {
    pub sample: AtmosphereSample,
}

impl AtmosphereSampler for FakeAtmosphereSampler {
    fn sample(&mut self) -> AtmosphereSample {
        AtmosphereSample {
            timestamp: Utc::now(),
            ..self.sample.clone()
        }
    }
}

impl<S: AtmosphereSampler + ?Sized> AtmosphereSampler for Box<S> {
    fn sample(&mut self) -> AtmosphereSample {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi::Pollutant;

    #[test]
    fn null_sampler_has_no_air_quality() {
        let sample = NullAtmosphereSampler {}.sample();
        assert!(sample.readings.is_empty());
        assert_eq!(sample.temperature, None);
        assert_eq!(sample.relative_humidity, None);
        assert!(!sample.air_quality(&AqiEngine::default()).is_available());
    }

    #[test]
    fn fake_sampler_repeats_sample() {
        let readings: Readings = [(Pollutant::Pm25, 10.0)].into_iter().collect();
        let mut sampler: Box<dyn AtmosphereSampler> = Box::new(FakeAtmosphereSampler {
            sample: AtmosphereSample {
                temperature: Some(21.0),
                relative_humidity: Some(45.0),
                readings: readings.clone(),
                ..Default::default()
            },
        });
        for _ in 0..2 {
            let sample = sampler.sample();
            assert_eq!(sample.readings, readings);
            assert_eq!(sample.temperature, Some(21.0));
            assert_eq!(sample.relative_humidity, Some(45.0));
            assert_ne!(sample.timestamp, DateTime::<Utc>::default());
            assert_eq!(sample.air_quality(&AqiEngine::default()).aqi(), Some(42));
        }
    }
}
