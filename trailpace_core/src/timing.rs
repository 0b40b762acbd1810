//! The segment time accumulator. Walks the profile once, applying the grade
//! model to every segment.

use logging_timer::time;

use crate::{
    estimate::{check_points_and_pace, Estimate},
    grade::{grade_percent, pace_factor},
    model::{MinPerKm, ProfilePoint, Segment},
};

/// Derives a Segment for every pair of consecutive points. The segment at
/// index `i` runs from point `i` to point `i + 1`.
pub fn segment_paces(points: &[ProfilePoint], base_pace: MinPerKm) -> Estimate<Vec<Segment>> {
    if let Err(reason) = check_points_and_pace(points, base_pace) {
        return Estimate::NoEstimate(reason);
    }

    Estimate::Value(build_segments(points, base_pace))
}

/// Estimates the total time, in minutes, to cover the profile at the given
/// flat-ground pace. The total is exactly the sum of the segment times.
#[time]
pub fn estimate_time(points: &[ProfilePoint], base_pace: MinPerKm) -> Estimate<f64> {
    segment_paces(points, base_pace).map(|segments| total_minutes(&segments))
}

/// Sums the time of a list of segments.
pub fn total_minutes(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.time_minutes).sum()
}

/// Like `estimate_time` but without the logging and argument checks, for the
/// solver's inner loop. The caller guarantees at least 2 points.
pub(crate) fn estimate_time_unchecked(points: &[ProfilePoint], base_pace: MinPerKm) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            let distance = pair[1].distance - pair[0].distance;
            let grade = grade_percent(distance, pair[1].elevation - pair[0].elevation);
            distance * base_pace * pace_factor(grade)
        })
        .sum()
}

fn build_segments(points: &[ProfilePoint], base_pace: MinPerKm) -> Vec<Segment> {
    points
        .windows(2)
        .enumerate()
        .map(|(start_index, pair)| {
            let (prev, current) = (pair[0], pair[1]);
            let distance = current.distance - prev.distance;
            let elevation_change = current.elevation - prev.elevation;
            let grade = grade_percent(distance, elevation_change);
            let pace_factor = pace_factor(grade);
            let pace = base_pace * pace_factor;

            Segment {
                start_index,
                start_distance: prev.distance,
                end_distance: current.distance,
                distance,
                elevation_change,
                grade,
                pace_factor,
                pace,
                time_minutes: distance * pace,
            }
        })
        .collect()
}
