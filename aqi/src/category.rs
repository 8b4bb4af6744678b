//! EPA health categories for AQI values.

use core::fmt;

use serde::{Serialize, Serializer};

/// The six EPA AQI categories, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// AQI 0–50: air quality is satisfactory.
    Good,
    /// AQI 51–100: acceptable; a concern for unusually sensitive people.
    Moderate,
    /// AQI 101–150.
    UnhealthyForSensitiveGroups,
    /// AQI 151–200.
    Unhealthy,
    /// AQI 201–300.
    VeryUnhealthy,
    /// AQI 301 and above, including extrapolated values past 500.
    Hazardous,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Good,
        Category::Moderate,
        Category::UnhealthyForSensitiveGroups,
        Category::Unhealthy,
        Category::VeryUnhealthy,
        Category::Hazardous,
    ];

    /// Classify an AQI value.
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthyForSensitiveGroups,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    /// Label for space-constrained displays.
    pub fn short_label(self) -> &'static str {
        match self {
            Category::UnhealthyForSensitiveGroups => "USG",
            other => other.label(),
        }
    }

    pub fn health_advisory(self) -> &'static str {
        match self {
            Category::Good => "Air quality is satisfactory, and air pollution poses little or no risk.",
            Category::Moderate => {
                "Air quality is acceptable. Unusually sensitive people should consider limiting prolonged outdoor exertion."
            }
            Category::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is less likely to be affected."
            }
            Category::Unhealthy => {
                "Some members of the general public may experience health effects; sensitive groups may experience more serious effects."
            }
            Category::VeryUnhealthy => "Health alert: the risk of health effects is increased for everyone.",
            Category::Hazardous => "Health warning of emergency conditions: everyone is more likely to be affected.",
        }
    }

    /// EPA reporting colour, as sRGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Category::Good => [0x00, 0xE4, 0x00],
            Category::Moderate => [0xFF, 0xFF, 0x00],
            Category::UnhealthyForSensitiveGroups => [0xFF, 0x7E, 0x00],
            Category::Unhealthy => [0xFF, 0x00, 0x00],
            Category::VeryUnhealthy => [0x8F, 0x3F, 0x97],
            Category::Hazardous => [0x7E, 0x00, 0x23],
        }
    }

    /// EPA reporting colour as a `#RRGGBB` string.
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// The AQI range covered by this category, for legends.
    pub fn range(self) -> &'static str {
        match self {
            Category::Good => "0-50",
            Category::Moderate => "51-100",
            Category::UnhealthyForSensitiveGroups => "101-150",
            Category::Unhealthy => "151-200",
            Category::VeryUnhealthy => "201-300",
            Category::Hazardous => "301+",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
