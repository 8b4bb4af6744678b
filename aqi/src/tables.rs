//! US EPA breakpoint tables.
//!
//! Tables are in each pollutant's canonical unit (see [`Pollutant::unit`]):
//! - PM2.5: µg/m³, 24-hour, truncated to 0.1
//! - PM10: µg/m³, 24-hour, truncated to 1
//! - O3: ppm, 8-hour, truncated to 0.001 (the 8-hour table ends at AQI 300)
//! - NO2: ppb, 1-hour, truncated to 1
//! - SO2: ppb, 1-hour, truncated to 1
//! - CO: ppm, 8-hour, truncated to 0.1

use once_cell::sync::Lazy;

use crate::table::{BreakpointTable, Segment};
use crate::Pollutant;

const PM25: [Segment; 7] = [
    Segment::new(0.0, 12.0, 0, 50),
    Segment::new(12.1, 35.4, 51, 100),
    Segment::new(35.5, 55.4, 101, 150),
    Segment::new(55.5, 150.4, 151, 200),
    Segment::new(150.5, 250.4, 201, 300),
    Segment::new(250.5, 350.4, 301, 400),
    Segment::new(350.5, 500.4, 401, 500),
];

const PM10: [Segment; 7] = [
    Segment::new(0.0, 54.0, 0, 50),
    Segment::new(55.0, 154.0, 51, 100),
    Segment::new(155.0, 254.0, 101, 150),
    Segment::new(255.0, 354.0, 151, 200),
    Segment::new(355.0, 424.0, 201, 300),
    Segment::new(425.0, 504.0, 301, 400),
    Segment::new(505.0, 604.0, 401, 500),
];

const O3_8H: [Segment; 5] = [
    Segment::new(0.0, 0.054, 0, 50),
    Segment::new(0.055, 0.070, 51, 100),
    Segment::new(0.071, 0.085, 101, 150),
    Segment::new(0.086, 0.105, 151, 200),
    Segment::new(0.106, 0.200, 201, 300),
];

const NO2_1H: [Segment; 7] = [
    Segment::new(0.0, 53.0, 0, 50),
    Segment::new(54.0, 100.0, 51, 100),
    Segment::new(101.0, 360.0, 101, 150),
    Segment::new(361.0, 649.0, 151, 200),
    Segment::new(650.0, 1249.0, 201, 300),
    Segment::new(1250.0, 1649.0, 301, 400),
    Segment::new(1650.0, 2049.0, 401, 500),
];

const SO2_1H: [Segment; 7] = [
    Segment::new(0.0, 35.0, 0, 50),
    Segment::new(36.0, 75.0, 51, 100),
    Segment::new(76.0, 185.0, 101, 150),
    Segment::new(186.0, 304.0, 151, 200),
    Segment::new(305.0, 604.0, 201, 300),
    Segment::new(605.0, 804.0, 301, 400),
    Segment::new(805.0, 1004.0, 401, 500),
];

const CO_8H: [Segment; 7] = [
    Segment::new(0.0, 4.4, 0, 50),
    Segment::new(4.5, 9.4, 51, 100),
    Segment::new(9.5, 12.4, 101, 150),
    Segment::new(12.5, 15.4, 151, 200),
    Segment::new(15.5, 30.4, 201, 300),
    Segment::new(30.5, 40.4, 301, 400),
    Segment::new(40.5, 50.4, 401, 500),
];

/// Build a shipped table. These are constants, so a failure here is a bug.
fn load(pollutant: Pollutant, decimals: u32, segments: &[Segment]) -> BreakpointTable {
    match BreakpointTable::new(decimals, segments) {
        Ok(table) => table,
        Err(e) => panic!("malformed {pollutant} breakpoint table: {e}"),
    }
}

static PM25_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::Pm25, 1, &PM25));
static PM10_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::Pm10, 0, &PM10));
static O3_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::O3, 3, &O3_8H));
static NO2_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::No2, 0, &NO2_1H));
static SO2_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::So2, 0, &SO2_1H));
static CO_TABLE: Lazy<BreakpointTable> = Lazy::new(|| load(Pollutant::Co, 1, &CO_8H));

/// The breakpoint table for a pollutant.
pub fn table(pollutant: Pollutant) -> &'static BreakpointTable {
    match pollutant {
        Pollutant::Pm25 => &PM25_TABLE,
        Pollutant::Pm10 => &PM10_TABLE,
        Pollutant::O3 => &O3_TABLE,
        Pollutant::No2 => &NO2_TABLE,
        Pollutant::So2 => &SO2_TABLE,
        Pollutant::Co => &CO_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::OutOfRange;
    use proptest::prelude::*;

    #[test]
    fn shipped_tables_are_well_formed() {
        for p in Pollutant::ALL {
            let segments = match p {
                Pollutant::Pm25 => &PM25[..],
                Pollutant::Pm10 => &PM10[..],
                Pollutant::O3 => &O3_8H[..],
                Pollutant::No2 => &NO2_1H[..],
                Pollutant::So2 => &SO2_1H[..],
                Pollutant::Co => &CO_8H[..],
            };
            let decimals = table(p).decimals();
            if let Err(e) = BreakpointTable::new(decimals, segments) {
                panic!("{p}: {e}");
            }
        }
    }

    #[test]
    fn bounds_map_exactly_to_index_bounds() {
        for p in Pollutant::ALL {
            for s in table(p).segments() {
                assert_eq!(
                    table(p).sub_index(s.concentration_low, OutOfRange::Strict),
                    Some(s.index_low),
                    "{p} at {}",
                    s.concentration_low
                );
                assert_eq!(
                    table(p).sub_index(s.concentration_high, OutOfRange::Strict),
                    Some(s.index_high),
                    "{p} at {}",
                    s.concentration_high
                );
            }
        }
    }

    #[test]
    fn negative_is_never_computable() {
        for p in Pollutant::ALL {
            assert_eq!(table(p).sub_index(-1.0, OutOfRange::Strict), None);
            assert_eq!(table(p).sub_index(-1.0, OutOfRange::Extrapolate), None);
        }
    }

    #[test]
    fn good_range_examples() {
        let pm25 = table(Pollutant::Pm25);
        let pm10 = table(Pollutant::Pm10);
        assert_eq!(pm25.sub_index(10.0, OutOfRange::Strict), Some(42));
        assert_eq!(pm10.sub_index(20.0, OutOfRange::Strict), Some(19));
    }

    #[test]
    fn pm25_moderate_to_sensitive_boundary() {
        let pm25 = table(Pollutant::Pm25);
        assert_eq!(pm25.sub_index(35.4, OutOfRange::Strict), Some(100));
        assert_eq!(pm25.sub_index(35.5, OutOfRange::Strict), Some(101));
        // Between authored bounds; truncated to 35.4.
        assert_eq!(pm25.sub_index(35.45, OutOfRange::Strict), Some(100));
    }

    #[test]
    fn pm25_above_table() {
        let pm25 = table(Pollutant::Pm25);
        assert_eq!(pm25.max_concentration(), 500.4);
        for _ in 0..3 {
            assert_eq!(pm25.sub_index(500.5, OutOfRange::Strict), None);
            assert_eq!(pm25.sub_index(500.5, OutOfRange::Extrapolate), Some(500));
        }
        assert_eq!(pm25.sub_index(600.0, OutOfRange::Extrapolate), Some(566));
    }

    #[test]
    fn ozone_tops_out_at_300() {
        let o3 = table(Pollutant::O3);
        assert_eq!(o3.sub_index(0.2, OutOfRange::Strict), Some(300));
        assert_eq!(o3.sub_index(0.201, OutOfRange::Strict), None);
    }

    fn pollutant() -> impl Strategy<Value = Pollutant> {
        prop::sample::select(Pollutant::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn monotonic_across_table(p in pollutant(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let t = table(p);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let max = t.max_concentration();
            let lo_idx = t.sub_index(lo * max, OutOfRange::Strict);
            let hi_idx = t.sub_index(hi * max, OutOfRange::Strict);
            prop_assert!(lo_idx.is_some() && hi_idx.is_some());
            prop_assert!(lo_idx <= hi_idx);
        }

        #[test]
        fn stays_within_segment_index_range(p in pollutant(), frac in 0.0f64..=1.0) {
            let t = table(p);
            let c = frac * t.max_concentration();
            let segment = t.segment_for(c).expect("covered");
            let index = t.sub_index(c, OutOfRange::Strict).expect("covered");
            prop_assert!(segment.index_low <= index && index <= segment.index_high);
        }
    }
}
