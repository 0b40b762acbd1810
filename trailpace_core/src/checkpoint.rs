//! Checkpoints: the elevation, elapsed time and pace at arbitrary distances
//! along the route.

use core::fmt;

use log::debug;
use logging_timer::time;
use serde::Serialize;

use crate::{
    error::NoEstimateReason,
    estimate::{check_points_and_pace, Estimate},
    model::{Km, Metres, MinPerKm, Percent, ProfilePoint, Segment},
    timing::{segment_paces, total_minutes},
};

/// What kind of ground a checkpoint sits on. The finish gets its own label
/// since it is not interpolated within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainLabel {
    Ascent,
    Descent,
    Flat,
    Finish,
}

impl fmt::Display for TerrainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainLabel::Ascent => write!(f, "ascent"),
            TerrainLabel::Descent => write!(f, "descent"),
            TerrainLabel::Flat => write!(f, "flat"),
            TerrainLabel::Finish => write!(f, "finish"),
        }
    }
}

/// Grades within +/- this many percent are labelled flat.
const LABEL_FLAT_BAND_PERCENT: Percent = 1.0;

impl TerrainLabel {
    /// The label for a checkpoint inside a segment of the given grade.
    pub fn for_grade(grade: Percent) -> Self {
        if grade > LABEL_FLAT_BAND_PERCENT {
            TerrainLabel::Ascent
        } else if grade < -LABEL_FLAT_BAND_PERCENT {
            TerrainLabel::Descent
        } else {
            TerrainLabel::Flat
        }
    }
}

/// A point of interest along the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    /// Where the checkpoint is.
    pub distance: Km,
    /// Elevation, linearly interpolated within the owning segment.
    pub elevation: Metres,
    /// Minutes from the start to reach the checkpoint.
    pub total_time: f64,
    /// Pace of the owning segment. For the finish this is the average pace
    /// over the whole route.
    pub pace: MinPerKm,
    /// Grade of the owning segment. None for the finish.
    pub grade: Option<Percent>,
    pub label: TerrainLabel,
}

/// Computes a checkpoint for each requested distance, plus a finish
/// checkpoint unless the last valid request is already the finish.
///
/// Requests that are not finite, negative, or past the end of the route are
/// dropped. Duplicates collapse into one checkpoint. The result is in
/// ascending order of distance.
#[time]
pub fn compute_checkpoints(
    points: &[ProfilePoint],
    base_pace: MinPerKm,
    query_distances: &[Km],
) -> Estimate<Vec<Checkpoint>> {
    if let Err(reason) = check_points_and_pace(points, base_pace) {
        return Estimate::NoEstimate(reason);
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let total_distance = last.distance;
    if !(total_distance - first.distance > 0.0) {
        return Estimate::NoEstimate(NoEstimateReason::ZeroDistance);
    }

    let queries = valid_queries(query_distances, first.distance, total_distance);
    let segments = match segment_paces(points, base_pace) {
        Estimate::Value(segments) => segments,
        Estimate::NoEstimate(reason) => return Estimate::NoEstimate(reason),
    };

    let mut checkpoints = Vec::with_capacity(queries.len() + 1);
    let mut next_query = 0;
    let mut time_before_segment = 0.0;

    for segment in &segments {
        if next_query >= queries.len() {
            break;
        }

        while next_query < queries.len() {
            let q = queries[next_query];
            let in_segment = q <= segment.end_distance
                && (q > segment.start_distance || (segment.start_index == 0 && q == first.distance));
            if !in_segment {
                break;
            }

            checkpoints.push(interpolate(points, segment, time_before_segment, q));
            next_query += 1;
        }

        time_before_segment += segment.time_minutes;
    }

    let needs_finish = queries.last().map_or(true, |&q| q != total_distance);
    if needs_finish {
        let finish_time = total_minutes(&segments);
        checkpoints.push(Checkpoint {
            distance: total_distance,
            elevation: last.elevation,
            total_time: finish_time,
            pace: finish_time / total_distance,
            grade: None,
            label: TerrainLabel::Finish,
        });
    }

    Estimate::Value(checkpoints)
}

/// Sorts and de-duplicates the requests and drops the ones that are outside
/// the route.
fn valid_queries(query_distances: &[Km], start: Km, end: Km) -> Vec<Km> {
    let mut queries: Vec<Km> = query_distances
        .iter()
        .copied()
        .filter(|q| q.is_finite() && *q >= start && *q <= end)
        .collect();

    let dropped = query_distances.len() - queries.len();
    if dropped > 0 {
        debug!("compute_checkpoints: dropped {dropped} distances outside {start}..={end} km");
    }

    queries.sort_by(|a, b| a.total_cmp(b));
    queries.dedup();
    queries
}

/// Builds the checkpoint for distance `q`, which lies within `segment`.
fn interpolate(
    points: &[ProfilePoint],
    segment: &Segment,
    time_before_segment: f64,
    q: Km,
) -> Checkpoint {
    let start = points[segment.start_index];
    let end = points[segment.start_index + 1];

    // Land exactly on the vertex rather than trusting the arithmetic to.
    let (elevation, total_time) = if q == end.distance {
        (end.elevation, time_before_segment + segment.time_minutes)
    } else if q == start.distance {
        (start.elevation, time_before_segment)
    } else {
        let ratio = (q - start.distance) / segment.distance;
        (
            start.elevation + ratio * segment.elevation_change,
            time_before_segment + ratio * segment.time_minutes,
        )
    };

    Checkpoint {
        distance: q,
        elevation,
        total_time,
        pace: segment.pace,
        grade: Some(segment.grade),
        label: TerrainLabel::for_grade(segment.grade),
    }
}

/// Spreads `count` checkpoint distances evenly along a route of
/// `total_distance`, excluding the start and the finish. Each distance is
/// rounded to 2 decimal places.
pub fn uniform_checkpoint_distances(total_distance: Km, count: usize) -> Vec<Km> {
    if !(total_distance > 0.0) || count == 0 {
        return Vec::new();
    }

    let interval = total_distance / (count + 1) as f64;
    (1..=count)
        .map(|i| (interval * i as f64 * 100.0).round() / 100.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(samples: &[(f64, f64)]) -> Vec<ProfilePoint> {
        samples
            .iter()
            .map(|&(d, e)| ProfilePoint::new(d, e))
            .collect()
    }

    fn example() -> Vec<ProfilePoint> {
        points(&[(0.0, 100.0), (1.0, 150.0), (2.0, 100.0), (5.0, 100.0)])
    }

    #[test]
    fn test_interpolates_within_segment() {
        let cps = compute_checkpoints(&example(), 5.0, &[0.5, 3.5]).value().unwrap();
        assert_eq!(cps.len(), 3);

        assert_eq!(cps[0].distance, 0.5);
        assert!((cps[0].elevation - 125.0).abs() < 1e-9);
        assert!((cps[0].total_time - 2.625).abs() < 1e-9);
        assert!((cps[0].pace - 5.25).abs() < 1e-9);
        assert_eq!(cps[0].label, TerrainLabel::Ascent);

        assert_eq!(cps[1].distance, 3.5);
        assert!((cps[1].elevation - 100.0).abs() < 1e-9);
        // 5.25 + 4.75 + 1.5 * 5.0
        assert!((cps[1].total_time - 17.5).abs() < 1e-9);
        assert_eq!(cps[1].label, TerrainLabel::Flat);
        assert_eq!(cps[1].grade, Some(0.0));

        assert_eq!(cps[2].label, TerrainLabel::Finish);
        assert_eq!(cps[2].distance, 5.0);
        assert_eq!(cps[2].elevation, 100.0);
        assert!((cps[2].total_time - 25.0).abs() < 1e-9);
        assert!((cps[2].pace - 5.0).abs() < 1e-9);
        assert_eq!(cps[2].grade, None);
    }

    #[test]
    fn test_vertex_gives_exact_elevation() {
        let p = points(&[(0.0, 100.1), (0.7, 150.3), (1.9, 101.7), (2.3, 99.9)]);
        let cps = compute_checkpoints(&p, 5.0, &[0.7, 1.9]).value().unwrap();
        assert_eq!(cps[0].elevation, 150.3);
        assert_eq!(cps[1].elevation, 101.7);
        assert_eq!(cps[1].label, TerrainLabel::Descent);
    }

    #[test]
    fn test_no_duplicate_finish() {
        let cps = compute_checkpoints(&example(), 5.0, &[2.0, 5.0]).value().unwrap();
        assert_eq!(cps.len(), 2);
        assert_eq!(cps[1].distance, 5.0);
        assert_eq!(cps[1].label, TerrainLabel::Flat);
        assert!((cps[1].total_time - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_queries_gives_finish_only() {
        let cps = compute_checkpoints(&example(), 5.0, &[]).value().unwrap();
        assert_eq!(cps.len(), 1);
        assert_eq!(cps[0].label, TerrainLabel::Finish);
    }

    #[test]
    fn test_out_of_range_and_duplicates() {
        let cps = compute_checkpoints(&example(), 5.0, &[7.0, 1.5, -1.0, 1.5, f64::NAN])
            .value()
            .unwrap();
        let distances: Vec<f64> = cps.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![1.5, 5.0]);
        assert_eq!(cps[0].label, TerrainLabel::Descent);
    }

    #[test]
    fn test_query_at_start() {
        let cps = compute_checkpoints(&example(), 5.0, &[0.0]).value().unwrap();
        assert_eq!(cps.len(), 2);
        assert_eq!(cps[0].distance, 0.0);
        assert_eq!(cps[0].elevation, 100.0);
        assert_eq!(cps[0].total_time, 0.0);
        assert_eq!(cps[0].label, TerrainLabel::Ascent);
    }

    #[test]
    fn test_unsorted_queries_come_back_sorted() {
        let cps = compute_checkpoints(&example(), 5.0, &[4.0, 0.25, 1.0]).value().unwrap();
        let distances: Vec<f64> = cps.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![0.25, 1.0, 4.0, 5.0]);
        assert!(cps.windows(2).all(|w| w[0].total_time <= w[1].total_time));
    }

    #[test]
    fn test_flat_band_labels() {
        // 0.5% up then 1.5% down.
        let p = points(&[(0.0, 0.0), (2.0, 10.0), (4.0, -20.0)]);
        let cps = compute_checkpoints(&p, 5.0, &[1.0, 3.0]).value().unwrap();
        assert_eq!(cps[0].label, TerrainLabel::Flat);
        assert_eq!(cps[1].label, TerrainLabel::Descent);
    }

    #[test]
    fn test_label_for_grade() {
        assert_eq!(TerrainLabel::for_grade(1.0), TerrainLabel::Flat);
        assert_eq!(TerrainLabel::for_grade(-1.0), TerrainLabel::Flat);
        assert_eq!(TerrainLabel::for_grade(0.0), TerrainLabel::Flat);
        assert_eq!(TerrainLabel::for_grade(1.01), TerrainLabel::Ascent);
        assert_eq!(TerrainLabel::for_grade(-1.01), TerrainLabel::Descent);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(
            compute_checkpoints(&example()[..1], 5.0, &[0.5]),
            Estimate::NoEstimate(NoEstimateReason::TooFewPoints(1))
        );
        let p = points(&[(0.0, 0.0), (0.0, 10.0)]);
        assert_eq!(
            compute_checkpoints(&p, 5.0, &[0.0]),
            Estimate::NoEstimate(NoEstimateReason::ZeroDistance)
        );
    }

    #[test]
    fn test_uniform_checkpoint_distances() {
        assert_eq!(uniform_checkpoint_distances(12.0, 5), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(uniform_checkpoint_distances(10.0, 2), vec![3.33, 6.67]);
        assert!(uniform_checkpoint_distances(10.0, 0).is_empty());
        assert!(uniform_checkpoint_distances(0.0, 3).is_empty());
    }
}
