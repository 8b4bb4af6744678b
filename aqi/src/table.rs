//! Breakpoint tables and the piecewise-linear AQI interpolation.

use tracing::trace;

/// Extra room added before truncating, so that a bound such as 35.4 is not
/// truncated to 35.3 by binary floating-point error.
const TRUNCATE_SLACK: f64 = 1e-6;

/// One segment of a breakpoint table: a concentration range mapped linearly
/// onto an index range. Both ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: u16,
    pub index_high: u16,
}

impl Segment {
    pub const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: u16,
        index_high: u16,
    ) -> Self {
        Segment {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    /// Returns true iff the concentration lies within this segment's range.
    pub fn contains(&self, concentration: f64) -> bool {
        self.concentration_low <= concentration && concentration <= self.concentration_high
    }

    /// The unrounded index for a concentration on this segment's line.
    ///
    /// Not limited to the segment's range: beyond the upper bound this is the
    /// linear extrapolation of the segment.
    pub fn interpolate(&self, concentration: f64) -> f64 {
        let slope = (f64::from(self.index_high) - f64::from(self.index_low))
            / (self.concentration_high - self.concentration_low);
        slope * (concentration - self.concentration_low) + f64::from(self.index_low)
    }

    /// The interpolated index, rounded half-up to an integer.
    pub fn index(&self, concentration: f64) -> u16 {
        round_index(self.interpolate(concentration))
    }
}

/// Round half-up and saturate into the index type.
///
/// Callers only pass non-negative values, for which `f64::round`
/// (half away from zero) is half-up.
fn round_index(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// What to do with a concentration above the highest segment of a table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// The concentration has no index.
    #[default]
    Strict,
    /// Continue the last segment's line; the index may exceed 500.
    Extrapolate,
}

/// A breakpoint table that violates the authoring rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("breakpoint table has no segments")]
    Empty,
    #[error("first segment starts at {0}, not at zero")]
    DoesNotStartAtZero(f64),
    #[error("segment {index}: concentration range is empty, inverted or not finite")]
    EmptyRange { index: usize },
    #[error("segment {index}: concentration bound {value} is finer than the table resolution")]
    OffResolution { index: usize, value: f64 },
    #[error("segment {index}: index range is inverted")]
    InvertedIndex { index: usize },
    #[error("segment {index} overlaps the previous segment")]
    Overlap { index: usize },
    #[error("segment {index} leaves a gap after the previous segment")]
    Gap { index: usize },
    #[error("segment {index}: index starts at {found}, expected {expected}")]
    IndexDiscontinuity {
        index: usize,
        expected: u16,
        found: u16,
    },
}

/// An ordered, validated set of segments for a single pollutant.
///
/// Concentrations are truncated to the table's resolution before lookup.
/// Adjacent segments are exactly one resolution step apart, so every
/// truncated concentration between zero and the top of the table falls
/// in exactly one segment.
#[derive(Debug, Clone)]
pub struct BreakpointTable {
    decimals: u32,
    segments: Vec<Segment>,
}

impl BreakpointTable {
    /// Validate and build a table whose bounds have `decimals` decimal places.
    pub fn new(decimals: u32, segments: &[Segment]) -> Result<Self, TableError> {
        let table = BreakpointTable {
            decimals,
            segments: segments.to_vec(),
        };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), TableError> {
        let first = self.segments.first().ok_or(TableError::Empty)?;
        if first.concentration_low != 0.0 {
            return Err(TableError::DoesNotStartAtZero(first.concentration_low));
        }

        let step = self.step();
        for (index, segment) in self.segments.iter().enumerate() {
            let (low, high) = (segment.concentration_low, segment.concentration_high);
            if !low.is_finite() || !high.is_finite() || high <= low {
                return Err(TableError::EmptyRange { index });
            }
            for value in [low, high] {
                if self.truncate(value) != value {
                    return Err(TableError::OffResolution { index, value });
                }
            }
            if segment.index_high < segment.index_low {
                return Err(TableError::InvertedIndex { index });
            }
            if index == 0 {
                continue;
            }

            let previous = &self.segments[index - 1];
            let spacing = low - previous.concentration_high;
            if spacing <= 0.0 {
                return Err(TableError::Overlap { index });
            }
            if spacing > step * (1.0 + TRUNCATE_SLACK) {
                return Err(TableError::Gap { index });
            }
            let expected = previous.index_high.saturating_add(1);
            if segment.index_low != expected {
                return Err(TableError::IndexDiscontinuity {
                    index,
                    expected,
                    found: segment.index_low,
                });
            }
        }
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of decimal places concentrations are truncated to.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Distance between adjacent representable concentrations.
    pub fn step(&self) -> f64 {
        1.0 / self.scale()
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    /// Highest concentration covered by the table.
    pub fn max_concentration(&self) -> f64 {
        self.segments
            .last()
            .map(|s| s.concentration_high)
            .unwrap_or_default()
    }

    /// Truncate (not round) a concentration to the table's resolution.
    pub fn truncate(&self, concentration: f64) -> f64 {
        let scale = self.scale();
        (concentration * scale + TRUNCATE_SLACK).floor() / scale
    }

    /// The segment a concentration falls in, after truncation.
    ///
    /// On a shared bound the first segment in ascending order wins.
    pub fn segment_for(&self, concentration: f64) -> Option<&Segment> {
        let c = self.truncate(concentration);
        self.segments.iter().find(|s| s.contains(c))
    }

    /// Compute the index for a concentration.
    ///
    /// Negative and non-finite concentrations have no index, whatever the
    /// policy. Concentrations above the table follow `policy`.
    pub fn sub_index(&self, concentration: f64, policy: OutOfRange) -> Option<u16> {
        if !concentration.is_finite() || concentration < 0.0 {
            trace!(concentration, "invalid concentration");
            return None;
        }
        let c = self.truncate(concentration);
        if let Some(segment) = self.segment_for(concentration) {
            return Some(segment.index(c));
        }

        let last = self.segments.last()?;
        match policy {
            OutOfRange::Strict => {
                trace!(concentration, max = last.concentration_high, "above table");
                None
            }
            OutOfRange::Extrapolate => Some(last.index(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tenths() -> BreakpointTable {
        BreakpointTable::new(
            1,
            &[
                Segment::new(0.0, 1.0, 0, 50),
                Segment::new(1.1, 2.0, 51, 100),
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn rounds_half_up() {
        let s = Segment::new(0.0, 10.0, 0, 5);
        assert_eq!(s.interpolate(1.0), 0.5);
        assert_eq!(s.index(1.0), 1);
        assert_eq!(s.index(3.0), 2);
        // Half-to-even would give 2.
        assert_eq!(s.index(5.0), 3);
        assert_eq!(s.index(4.0), 2);
    }

    #[test]
    fn hits_exact_bounds() {
        let t = tenths();
        assert_eq!(t.sub_index(0.0, OutOfRange::Strict), Some(0));
        assert_eq!(t.sub_index(1.0, OutOfRange::Strict), Some(50));
        assert_eq!(t.sub_index(1.1, OutOfRange::Strict), Some(51));
        assert_eq!(t.sub_index(2.0, OutOfRange::Strict), Some(100));
    }

    #[test]
    fn truncates_into_lower_segment() {
        let t = tenths();
        // 1.05 truncates to 1.0, the top of the first segment.
        assert_eq!(t.truncate(1.05), 1.0);
        assert_eq!(t.sub_index(1.05, OutOfRange::Strict), Some(50));
        assert_eq!(t.segment_for(1.09), Some(&t.segments()[0]));
    }

    #[test]
    fn invalid_concentrations_have_no_index() {
        let t = tenths();
        for policy in [OutOfRange::Strict, OutOfRange::Extrapolate] {
            assert_eq!(t.sub_index(-1.0, policy), None);
            assert_eq!(t.sub_index(-0.01, policy), None);
            assert_eq!(t.sub_index(f64::NAN, policy), None);
            assert_eq!(t.sub_index(f64::INFINITY, policy), None);
        }
    }

    #[test]
    fn out_of_range_follows_policy() {
        let t = tenths();
        assert_eq!(t.sub_index(2.1, OutOfRange::Strict), None);
        // Slope of the last segment is 49 / 0.9.
        assert_eq!(t.sub_index(2.9, OutOfRange::Extrapolate), Some(149));
    }

    #[test]
    fn extrapolation_saturates() {
        let t = tenths();
        assert_eq!(t.sub_index(1e12, OutOfRange::Extrapolate), Some(u16::MAX));
    }

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(BreakpointTable::new(1, &[]).unwrap_err(), TableError::Empty);
        assert_eq!(
            BreakpointTable::new(1, &[Segment::new(0.5, 1.0, 0, 50)]).unwrap_err(),
            TableError::DoesNotStartAtZero(0.5)
        );
        assert_eq!(
            BreakpointTable::new(1, &[Segment::new(0.0, 0.0, 0, 50)]).unwrap_err(),
            TableError::EmptyRange { index: 0 }
        );
        assert_eq!(
            BreakpointTable::new(1, &[Segment::new(0.0, 1.05, 0, 50)]).unwrap_err(),
            TableError::OffResolution {
                index: 0,
                value: 1.05
            }
        );
        assert_eq!(
            BreakpointTable::new(1, &[Segment::new(0.0, 1.0, 50, 0)]).unwrap_err(),
            TableError::InvertedIndex { index: 0 }
        );
        assert_eq!(
            BreakpointTable::new(
                1,
                &[Segment::new(0.0, 1.0, 0, 50), Segment::new(1.0, 2.0, 51, 100)]
            )
            .unwrap_err(),
            TableError::Overlap { index: 1 }
        );
        assert_eq!(
            BreakpointTable::new(
                1,
                &[Segment::new(0.0, 1.0, 0, 50), Segment::new(1.5, 2.0, 51, 100)]
            )
            .unwrap_err(),
            TableError::Gap { index: 1 }
        );
        assert_eq!(
            BreakpointTable::new(
                1,
                &[Segment::new(0.0, 1.0, 0, 50), Segment::new(1.1, 2.0, 50, 100)]
            )
            .unwrap_err(),
            TableError::IndexDiscontinuity {
                index: 1,
                expected: 51,
                found: 50
            }
        );
    }

    proptest! {
        #[test]
        fn monotonic_within_segment(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let t = tenths();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_idx = t.sub_index(lo, OutOfRange::Strict).unwrap();
            let hi_idx = t.sub_index(hi, OutOfRange::Strict).unwrap();
            prop_assert!(lo_idx <= hi_idx);
        }

        #[test]
        fn every_value_in_range_has_an_index(c in 0.0f64..=2.0) {
            prop_assert!(tenths().sub_index(c, OutOfRange::Strict).is_some());
        }
    }
}
