//! US EPA Air Quality Index computation.
//!
//! Converts pollutant concentrations into sub-indices by piecewise-linear
//! interpolation over the EPA breakpoint tables, and aggregates them into an
//! overall index with a dominant pollutant.
//!
//! ```
//! use aqi::{Pollutant, Readings};
//!
//! let readings: Readings = [(Pollutant::Pm25, 10.0), (Pollutant::Pm10, 20.0)]
//!     .into_iter()
//!     .collect();
//! let report = aqi::compute(&readings);
//! assert_eq!(report.aqi(), Some(42));
//! assert_eq!(report.dominant(), Some(Pollutant::Pm25));
//! ```
//!
//! Everything here is pure computation over immutable tables, safe to call
//! from any number of threads.

mod category;
mod engine;
mod pollutant;
pub mod table;
pub mod tables;

pub use category::Category;
pub use engine::{compute, AqiEngine, AqiReport, Overall, Readings, Settings, SubIndex};
pub use pollutant::{ParsePollutantError, ParseUnitError, Pollutant, Unit};
pub use table::{BreakpointTable, OutOfRange, Segment, TableError};
