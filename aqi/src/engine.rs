//! Multi-pollutant aggregation.

use std::collections::BTreeMap;

use core::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::table::OutOfRange;
use crate::{tables, Category, Pollutant};

/// Concentrations to compute an AQI from, keyed by pollutant.
///
/// Each concentration is in the pollutant's canonical unit.
/// Pollutants without a reading are absent; they are never treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings(BTreeMap<Pollutant, f64>);

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concentration for a pollutant, returning the previous one.
    pub fn insert(&mut self, pollutant: Pollutant, concentration: f64) -> Option<f64> {
        self.0.insert(pollutant, concentration)
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.0.get(&pollutant).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Readings in canonical pollutant order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.0.iter().map(|(p, c)| (*p, *c))
    }
}

impl FromIterator<(Pollutant, f64)> for Readings {
    fn from_iter<T: IntoIterator<Item = (Pollutant, f64)>>(iter: T) -> Self {
        Readings(iter.into_iter().collect())
    }
}

/// Settings for an [`AqiEngine`].
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Handling of concentrations above a pollutant's table.
    /// Applies to every pollutant. Defaults to [`OutOfRange::Strict`].
    pub out_of_range: OutOfRange,
}

impl Settings {
    pub fn with_out_of_range(mut self, out_of_range: OutOfRange) -> Self {
        self.out_of_range = out_of_range;
        self
    }
}

/// Computes sub-indices and the overall AQI.
///
/// Stateless apart from its settings; shareable across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct AqiEngine {
    settings: Settings,
}

impl AqiEngine {
    pub fn new(settings: Settings) -> Self {
        AqiEngine { settings }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The AQI for one pollutant in isolation, if computable.
    pub fn sub_index(&self, pollutant: Pollutant, concentration: f64) -> Option<u16> {
        tables::table(pollutant).sub_index(concentration, self.settings.out_of_range)
    }

    /// Compute every sub-index and the overall AQI.
    ///
    /// Readings that are invalid or out of range are left out of the report.
    /// When nothing is computable the overall AQI is [`Overall::Unavailable`].
    pub fn compute(&self, readings: &Readings) -> AqiReport {
        let mut sub_indices = Vec::with_capacity(readings.len());
        for (pollutant, concentration) in readings.iter() {
            match self.sub_index(pollutant, concentration) {
                Some(aqi) => sub_indices.push(SubIndex { pollutant, aqi }),
                None => debug!(%pollutant, concentration, "reading excluded from AQI"),
            }
        }

        // Sub-indices are in canonical order; only a strictly larger value
        // displaces the current maximum.
        let overall = sub_indices
            .iter()
            .fold(None::<&SubIndex>, |best, s| match best {
                Some(b) if b.aqi >= s.aqi => Some(b),
                _ => Some(s),
            })
            .map(|s| Overall::Available {
                aqi: s.aqi,
                dominant: s.pollutant,
            })
            .unwrap_or(Overall::Unavailable);

        AqiReport {
            overall,
            sub_indices,
        }
    }
}

/// Compute a report with the default (strict) settings.
pub fn compute(readings: &Readings) -> AqiReport {
    AqiEngine::default().compute(readings)
}

/// The AQI of a single pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubIndex {
    pub pollutant: Pollutant,
    pub aqi: u16,
}

impl SubIndex {
    pub fn category(&self) -> Category {
        Category::from_aqi(self.aqi)
    }
}

impl Serialize for SubIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SubIndex", 3)?;
        s.serialize_field("pollutant", &self.pollutant)?;
        s.serialize_field("aqi", &self.aqi)?;
        s.serialize_field("category", &self.category())?;
        s.end()
    }
}

/// The overall AQI, or the absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overall {
    Available { aqi: u16, dominant: Pollutant },
    /// No reading was computable. Distinct from an AQI of zero.
    Unavailable,
}

/// Result of an AQI computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AqiReport {
    pub overall: Overall,
    /// Computable sub-indices, in canonical pollutant order.
    pub sub_indices: Vec<SubIndex>,
}

impl AqiReport {
    /// The overall AQI, if any reading was computable.
    pub fn aqi(&self) -> Option<u16> {
        match self.overall {
            Overall::Available { aqi, .. } => Some(aqi),
            Overall::Unavailable => None,
        }
    }

    /// The pollutant that determined the overall AQI.
    pub fn dominant(&self) -> Option<Pollutant> {
        match self.overall {
            Overall::Available { dominant, .. } => Some(dominant),
            Overall::Unavailable => None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.aqi().map(Category::from_aqi)
    }

    pub fn is_available(&self) -> bool {
        self.overall != Overall::Unavailable
    }

    /// The sub-index of one pollutant, if it was computed.
    pub fn sub_index(&self, pollutant: Pollutant) -> Option<u16> {
        self.sub_indices
            .iter()
            .find(|s| s.pollutant == pollutant)
            .map(|s| s.aqi)
    }
}

impl fmt::Display for AqiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.overall {
            Overall::Available { aqi, dominant } => write!(
                f,
                "AQI {aqi} ({}, dominant {})",
                Category::from_aqi(aqi),
                dominant.label()
            ),
            Overall::Unavailable => write!(f, "AQI unavailable"),
        }
    }
}

impl Serialize for AqiReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AqiReport", 4)?;
        s.serialize_field("aqi", &self.aqi())?;
        s.serialize_field("dominant", self.dominant().map_or("none", Pollutant::id))?;
        s.serialize_field("category", &self.category())?;
        s.serialize_field("sub_indices", &self.sub_indices)?;
        s.end()
    }
}
