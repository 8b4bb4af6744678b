//! Pollutant identifiers and their canonical units.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A pollutant with an AQI breakpoint table.
///
/// The declaration order is the canonical order: it is the order in which
/// sub-indices are reported, and breaks ties when picking the dominant pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pollutant {
    /// Fine particulate matter, 24-hour average.
    Pm25,
    /// Coarse particulate matter, 24-hour average.
    Pm10,
    /// Ozone, 8-hour average.
    O3,
    /// Nitrogen dioxide, 1-hour average.
    No2,
    /// Sulfur dioxide, 1-hour average.
    So2,
    /// Carbon monoxide, 8-hour average.
    Co,
}

impl Pollutant {
    /// Every pollutant, in canonical order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Canonical identifier, as used in reports.
    pub fn id(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "Ozone",
            Pollutant::No2 => "Nitrogen dioxide",
            Pollutant::So2 => "Sulfur dioxide",
            Pollutant::Co => "Carbon monoxide",
        }
    }

    /// Unit the breakpoint table for this pollutant is authored in.
    ///
    /// Concentrations handed to the engine must already be in this unit;
    /// gases in particular are not converted from mass concentrations.
    pub fn unit(self) -> Unit {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 => Unit::MicrogramsPerCubicMeter,
            Pollutant::O3 | Pollutant::Co => Unit::PartsPerMillion,
            Pollutant::No2 | Pollutant::So2 => Unit::PartsPerBillion,
        }
    }

    /// True for the particulate pollutants.
    pub fn is_particulate(self) -> bool {
        matches!(self, Pollutant::Pm25 | Pollutant::Pm10)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A name that does not identify any supported pollutant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pollutant: {0:?}")]
pub struct ParsePollutantError(pub String);

impl FromStr for Pollutant {
    type Err = ParsePollutantError;

    /// Parse a pollutant name, accepting the spellings providers use
    /// (`pm2_5`, `PM2.5`, `ozone`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let p = match normalized.as_str() {
            "pm25" | "pm2.5" | "pm2_5" | "pm_25" | "pm_2_5" => Pollutant::Pm25,
            "pm10" | "pm_10" => Pollutant::Pm10,
            "o3" | "ozone" => Pollutant::O3,
            "no2" => Pollutant::No2,
            "so2" => Pollutant::So2,
            "co" => Pollutant::Co,
            _ => return Err(ParsePollutantError(s.to_string())),
        };
        Ok(p)
    }
}

impl Serialize for Pollutant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Pollutant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Concentration units used by the breakpoint tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    MicrogramsPerCubicMeter,
    PartsPerMillion,
    PartsPerBillion,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::MicrogramsPerCubicMeter => "µg/m³",
            Unit::PartsPerMillion => "ppm",
            Unit::PartsPerBillion => "ppb",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A unit label that is not one of the table units.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized unit: {0:?}")]
pub struct ParseUnitError(pub String);

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Both MICRO SIGN and GREEK SMALL LETTER MU show up in the wild.
        let normalized = s.trim().to_lowercase().replace(|c: char| c == 'µ' || c == 'μ', "u");
        match normalized.as_str() {
            "ug/m3" | "ug/m³" | "ug/m^3" | "ugm3" => Ok(Unit::MicrogramsPerCubicMeter),
            "ppm" => Ok(Unit::PartsPerMillion),
            "ppb" => Ok(Unit::PartsPerBillion),
            _ => Err(ParseUnitError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_spellings() {
        for name in ["pm25", "pm2.5", "pm2_5", "PM2.5", " PM25 "] {
            assert_eq!(name.parse::<Pollutant>(), Ok(Pollutant::Pm25), "{name}");
        }
        assert_eq!("PM10".parse::<Pollutant>(), Ok(Pollutant::Pm10));
        assert_eq!("ozone".parse::<Pollutant>(), Ok(Pollutant::O3));
        assert_eq!("CO".parse::<Pollutant>(), Ok(Pollutant::Co));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "pm1".parse::<Pollutant>().expect_err("pm1 has no table");
        assert_eq!(err, ParsePollutantError("pm1".into()));
        assert!("".parse::<Pollutant>().is_err());
    }

    #[test]
    fn ids_round_trip_through_parse() {
        for p in Pollutant::ALL {
            assert_eq!(p.id().parse::<Pollutant>(), Ok(p));
        }
    }

    #[test]
    fn canonical_order_matches_ord() {
        let mut sorted = Pollutant::ALL;
        sorted.sort();
        assert_eq!(sorted, Pollutant::ALL);
    }

    #[test]
    fn parses_unit_labels() {
        for label in ["µg/m³", "μg/m³", "ug/m3", "UG/M3", "ug/m^3"] {
            assert_eq!(
                label.parse::<Unit>(),
                Ok(Unit::MicrogramsPerCubicMeter),
                "{label}"
            );
        }
        assert_eq!("ppm".parse::<Unit>(), Ok(Unit::PartsPerMillion));
        assert_eq!("PPB".parse::<Unit>(), Ok(Unit::PartsPerBillion));
        assert!("mg/m3".parse::<Unit>().is_err());
    }

    #[test]
    fn serializes_as_id() {
        let json = serde_json::to_string(&Pollutant::Pm25).unwrap();
        assert_eq!(json, "\"pm25\"");
        let p: Pollutant = serde_json::from_str("\"pm2_5\"").unwrap();
        assert_eq!(p, Pollutant::Pm25);
    }
}
