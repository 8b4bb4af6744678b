//! Print the AQI report for one provider payload.
//!
//! Usage: `aqi-report [--strict | --extrapolate] [PATH]`
//!
//! Reads the payload from PATH, or from stdin when PATH is absent or `-`.

use std::path::PathBuf;
use std::process::ExitCode;

use airwatch::{config::parse_out_of_range, provider};
use aqi::{AqiEngine, OutOfRange, Settings};

fn main() -> ExitCode {
    airwatch::init_tracing();

    let mut out_of_range = OutOfRange::default();
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        if let Some(flag) = arg.strip_prefix("--") {
            match parse_out_of_range(flag) {
                Some(policy) => out_of_range = policy,
                None => {
                    tracing::error!("unknown flag {:?}", arg);
                    return ExitCode::FAILURE;
                }
            }
        } else if arg == "-" {
            path = None;
        } else {
            path = Some(PathBuf::from(arg));
        }
    }

    let observation = match &path {
        Some(path) => provider::read_file(path),
        None => provider::read(std::io::stdin().lock()),
    };
    let readings = match observation {
        Ok(observation) => observation.readings,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let engine = AqiEngine::new(Settings::default().with_out_of_range(out_of_range));
    let report = engine.compute(&readings);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("could not encode report: {}", e);
            ExitCode::FAILURE
        }
    }
}
