//! Normalize third-party air-quality payloads into engine readings.
//!
//! Two shapes are understood:
//! - a flat object of fields, e.g. `{"pm2_5": 10.0, "pm10": 20}`, as
//!   returned by component-style APIs (Open-Meteo, OpenWeatherMap);
//! - a list of measurements, e.g.
//!   `[{"parameter": "pm25", "value": 10.0, "unit": "µg/m³"}]`, as returned
//!   by station-style APIs (OpenAQ).
//!
//! No unit conversion happens here. Flat payloads have no units and report
//! gases by mass, so only particulates are taken from them. A measurement
//! with a unit other than its pollutant's table unit is dropped.
//!
//! An entry that is not usable (unknown name, null or non-numeric value,
//! wrong unit) is skipped on its own; the rest of the payload still counts.
//! When a pollutant appears twice, the entry later in the document wins.

use std::io::Read;
use std::path::Path;

use aqi::{Pollutant, Readings, Unit};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("malformed provider payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read provider payload: {0}")]
    Io(#[from] std::io::Error),
}

/// One measurement from a station-style provider.
///
/// `value` is kept as raw JSON: providers send `null` or strings for
/// missing data, and those entries are skipped individually.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Measurement {
    pub parameter: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub unit: Option<String>,
}

/// What a provider payload says about local conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub readings: Readings,
    /// Temperature in degrees Celsius.
    pub temperature: Option<f32>,
    /// Relative humidity as a percentage (i.e. range 0.0 to 100.0).
    pub relative_humidity: Option<f32>,
}

/// A decoded provider payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Measurements(Vec<Measurement>),
    Fields(Map<String, Value>),
}

impl Payload {
    pub fn into_observation(self) -> Observation {
        match self {
            Payload::Measurements(m) => from_measurements(m),
            Payload::Fields(f) => from_fields(&f),
        }
    }
}

/// Parse a JSON payload.
pub fn parse(json: &str) -> Result<Observation, ProviderError> {
    let payload: Payload = serde_json::from_str(json)?;
    Ok(payload.into_observation())
}

/// Read a JSON payload from a reader.
pub fn read(reader: impl Read) -> Result<Observation, ProviderError> {
    let payload: Payload = serde_json::from_reader(reader)?;
    Ok(payload.into_observation())
}

/// Read a JSON payload from a file.
pub fn read_file(path: &Path) -> Result<Observation, ProviderError> {
    let file = std::fs::File::open(path)?;
    read(std::io::BufReader::new(file))
}

/// Non-pollutant quantities some providers include alongside pollutants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ambient {
    Temperature,
    RelativeHumidity,
}

impl Ambient {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temperature_2m" | "temp" => Some(Ambient::Temperature),
            "relative_humidity" | "relative_humidity_2m" | "relativehumidity" | "humidity" => {
                Some(Ambient::RelativeHumidity)
            }
            _ => None,
        }
    }

    /// Whether a declared unit label is the one this quantity is stored in.
    fn accepts_unit(self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        match self {
            Ambient::Temperature => matches!(label.as_str(), "c" | "°c" | "celsius"),
            Ambient::RelativeHumidity => label == "%",
        }
    }
}

impl Observation {
    fn insert(&mut self, pollutant: Pollutant, value: f64) {
        if let Some(previous) = self.readings.insert(pollutant, value) {
            debug!(%pollutant, previous, value, "duplicate reading replaced");
        }
    }

    fn set_ambient(&mut self, ambient: Ambient, value: f64) {
        let value = value as f32;
        match ambient {
            Ambient::Temperature => self.temperature = Some(value),
            Ambient::RelativeHumidity => self.relative_humidity = Some(value),
        }
    }
}

/// Observation from a flat object of fields. Only particulates are kept
/// as pollutant readings.
pub fn from_fields(fields: &Map<String, Value>) -> Observation {
    let mut observation = Observation::default();
    for (name, value) in fields {
        if let Some(ambient) = Ambient::from_name(name) {
            match value.as_f64() {
                Some(v) => observation.set_ambient(ambient, v),
                None => debug!(field = %name, %value, "non-numeric field"),
            }
            continue;
        }
        let Ok(pollutant) = name.parse::<Pollutant>() else {
            trace!(field = %name, "not a pollutant");
            continue;
        };
        if !pollutant.is_particulate() {
            debug!(%pollutant, "skipping unitless gas field");
            continue;
        }
        match value.as_f64() {
            Some(v) => observation.insert(pollutant, v),
            None => debug!(%pollutant, %value, "non-numeric field"),
        }
    }
    observation
}

/// Observation from a list of measurements.
pub fn from_measurements(measurements: impl IntoIterator<Item = Measurement>) -> Observation {
    let mut observation = Observation::default();
    for m in measurements {
        if let Some(ambient) = Ambient::from_name(&m.parameter) {
            let unit_ok = m.unit.as_deref().map_or(true, |u| ambient.accepts_unit(u));
            match m.value.as_f64() {
                Some(v) if unit_ok => observation.set_ambient(ambient, v),
                Some(_) => warn!(parameter = %m.parameter, unit = ?m.unit, "dropping measurement in the wrong unit"),
                None => debug!(parameter = %m.parameter, value = %m.value, "non-numeric value"),
            }
            continue;
        }
        let Ok(pollutant) = m.parameter.parse::<Pollutant>() else {
            trace!(parameter = %m.parameter, "not a pollutant");
            continue;
        };
        let Some(value) = m.value.as_f64() else {
            debug!(%pollutant, value = %m.value, "non-numeric value");
            continue;
        };
        if let Some(label) = &m.unit {
            match label.parse::<Unit>() {
                Ok(unit) if unit == pollutant.unit() => {}
                Ok(unit) => {
                    warn!(%pollutant, %unit, expected = %pollutant.unit(), "dropping measurement in the wrong unit");
                    continue;
                }
                Err(e) => {
                    warn!(%pollutant, "dropping measurement: {}", e);
                    continue;
                }
            }
        }
        observation.insert(pollutant, value);
    }
    observation
}
