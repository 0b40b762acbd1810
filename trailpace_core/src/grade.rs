//! The grade model: how much slower (or faster) than flat-ground pace you
//! move on a given slope.
//!
//! Both tables are bucketed on the magnitude of the grade. A boundary value
//! belongs to the lower, less extreme bucket, so exactly 5% uphill is still
//! 1.05 and exactly 10% downhill is still 0.90. These buckets and their
//! boundary convention are tuning choices kept for compatibility with
//! existing estimates; they are not derived from any physiological model.

use crate::model::{Km, Metres, Percent};

/// Upper bound of each bucket (inclusive) and its multiplier, for ascents.
const ASCENT_FACTORS: [(Percent, f64); 4] = [(5.0, 1.05), (10.0, 1.15), (15.0, 1.25), (20.0, 1.35)];
/// Multiplier for ascents steeper than the last bucket.
const ASCENT_EXTREME_FACTOR: f64 = 1.50;

/// Upper bound of each bucket (inclusive) and its multiplier, for descents.
const DESCENT_FACTORS: [(Percent, f64); 4] = [(5.0, 0.95), (10.0, 0.90), (15.0, 0.85), (20.0, 0.82)];
/// Multiplier for descents steeper than the last bucket.
const DESCENT_EXTREME_FACTOR: f64 = 0.80;

/// Calculates the grade of a segment as a percentage. A zero-length segment
/// has a grade of 0 rather than being an error.
pub fn grade_percent(segment_distance: Km, elevation_change: Metres) -> Percent {
    if segment_distance > 0.0 {
        (elevation_change / (segment_distance * 1000.0)) * 100.0
    } else {
        0.0
    }
}

/// Maps a grade to a pace multiplier. Total: every input, including NaN,
/// produces a positive factor (NaN is treated as flat).
pub fn pace_factor(grade: Percent) -> f64 {
    if grade > 0.0 {
        bucket(grade, &ASCENT_FACTORS, ASCENT_EXTREME_FACTOR)
    } else if grade < 0.0 {
        bucket(grade.abs(), &DESCENT_FACTORS, DESCENT_EXTREME_FACTOR)
    } else {
        1.0
    }
}

fn bucket(magnitude: Percent, table: &[(Percent, f64)], extreme: f64) -> f64 {
    table
        .iter()
        .find(|(upper, _)| magnitude <= *upper)
        .map(|&(_, factor)| factor)
        .unwrap_or(extreme)
}
