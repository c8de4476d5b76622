//! Threshold recalibration.
//!
//! [`ThresholdCalibrator`] recomputes decision thresholds from the score
//! distribution of recorded decisions; [`ThresholdStore`] holds the active
//! snapshot and swaps it atomically.

mod calibrator;
mod store;

pub use calibrator::{CalibrationResult, ThresholdCalibrator};
pub use store::ThresholdStore;
