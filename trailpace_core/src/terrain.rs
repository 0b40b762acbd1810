//! Contains the functionality relating to terrain runs: stretches of the
//! route that are all uphill, all downhill or all flat. Noisy elevation data
//! flips the class of single segments back and forth, so a run only ends
//! when the change looks real.

use core::fmt;
use std::ops::Range;

use logging_timer::time;
use serde::Serialize;

use crate::{
    estimate::Estimate,
    grade::grade_percent,
    model::{Km, Metres, MinPerKm, Percent, ProfilePoint, Segment},
    timing::segment_paces,
};

/// Grades within +/- this many percent count as flat.
pub const FLAT_BAND_PERCENT: Percent = 1.0;

/// A change of class only ends a run that already has more than this many
/// points...
pub const RUN_MIN_POINTS: usize = 3;

/// ...unless the segment causing the change is steeper than this.
pub const RUN_BREAK_GRADE_PERCENT: Percent = 3.0;

/// The class of a stretch of terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainClass {
    Ascent,
    Descent,
    Flat,
}

impl fmt::Display for TerrainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainClass::Ascent => write!(f, "Ascent"),
            TerrainClass::Descent => write!(f, "Descent"),
            TerrainClass::Flat => write!(f, "Flat"),
        }
    }
}

impl TerrainClass {
    /// Classifies a grade using the standard flat band.
    pub fn classify(grade: Percent) -> Self {
        Self::classify_with_band(grade, FLAT_BAND_PERCENT)
    }

    pub fn classify_with_band(grade: Percent, flat_band: Percent) -> Self {
        if grade > flat_band {
            TerrainClass::Ascent
        } else if grade < -flat_band {
            TerrainClass::Descent
        } else {
            TerrainClass::Flat
        }
    }
}

/// These are the parameters that control the run-finding algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainParameters {
    /// Grades within +/- this are flat.
    pub flat_band_percent: Percent,

    /// See `RUN_MIN_POINTS`.
    pub min_run_points: usize,
    /// See `RUN_BREAK_GRADE_PERCENT`. Applies in either direction.
    pub break_grade_percent: Percent,
}

impl Default for TerrainParameters {
    fn default() -> Self {
        Self {
            flat_band_percent: FLAT_BAND_PERCENT,
            min_run_points: RUN_MIN_POINTS,
            break_grade_percent: RUN_BREAK_GRADE_PERCENT,
        }
    }
}

/// A maximal stretch of consecutive segments of the same class.
///
/// Runs share their boundary point: a run ending at point N is followed by
/// a run starting at point N. Their segment ranges do not overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainRun {
    pub class: TerrainClass,
    /// Index of the first ProfilePoint in the run.
    pub start_index: usize,
    /// Index of the last ProfilePoint in the run.
    pub end_index: usize,
    pub start_distance: Km,
    pub end_distance: Km,
    pub start_elevation: Metres,
    pub end_elevation: Metres,
    /// Length of the run.
    pub distance: Km,
    /// Last elevation minus first elevation.
    pub elevation_change: Metres,
    /// Grade over the whole run, 0 if the run has no length.
    pub average_grade: Percent,
    /// Mean of the paces of the run's segments.
    pub average_pace: MinPerKm,
    /// `distance * average_pace`, in minutes.
    pub estimated_time: f64,
}

impl TerrainRun {
    /// The indexes of the run's segments in the list from `segment_paces`.
    pub fn segments(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn segment_count(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn point_count(&self) -> usize {
        self.segment_count() + 1
    }

    /// Builds a run covering points `start_index..=end_index`. There must be
    /// at least one segment in the range.
    fn new(
        class: TerrainClass,
        points: &[ProfilePoint],
        segments: &[Segment],
        start_index: usize,
        end_index: usize,
    ) -> Self {
        assert!(start_index < end_index);

        let first = points[start_index];
        let last = points[end_index];
        let distance = last.distance - first.distance;
        let elevation_change = last.elevation - first.elevation;

        let run_segments = &segments[start_index..end_index];
        let average_pace =
            run_segments.iter().map(|s| s.pace).sum::<f64>() / run_segments.len() as f64;

        Self {
            class,
            start_index,
            end_index,
            start_distance: first.distance,
            end_distance: last.distance,
            start_elevation: first.elevation,
            end_elevation: last.elevation,
            distance,
            elevation_change,
            average_grade: grade_percent(distance, elevation_change),
            average_pace,
            estimated_time: distance * average_pace,
        }
    }
}

/// Splits the profile into terrain runs using the default parameters.
pub fn segment_terrain(points: &[ProfilePoint], base_pace: MinPerKm) -> Estimate<Vec<TerrainRun>> {
    segment_terrain_with(points, base_pace, &TerrainParameters::default())
}

/// Splits the profile into terrain runs.
///
/// Invariants: the first run starts at point 0 and the last run ends at the
/// last point. Every segment belongs to exactly one run, so the segment
/// counts of the runs add up to `points.len() - 1`.
///
/// Each segment is classified on its own grade. When the class differs from
/// the current run's, a new run is only started if the current run has more
/// than `min_run_points` points or the segment is steeper than
/// `break_grade_percent`. Otherwise the segment is absorbed into the current
/// run, whatever its own class.
#[time]
pub fn segment_terrain_with(
    points: &[ProfilePoint],
    base_pace: MinPerKm,
    params: &TerrainParameters,
) -> Estimate<Vec<TerrainRun>> {
    let segments = match segment_paces(points, base_pace) {
        Estimate::Value(segments) => segments,
        Estimate::NoEstimate(reason) => return Estimate::NoEstimate(reason),
    };

    let mut runs = Vec::new();
    let mut current_class = TerrainClass::classify_with_band(segments[0].grade, params.flat_band_percent);
    let mut run_start = 0;

    for segment in segments.iter().skip(1) {
        let class = TerrainClass::classify_with_band(segment.grade, params.flat_band_percent);
        if class == current_class {
            continue;
        }

        // Points in the current run so far: run_start..=segment.start_index.
        let run_points = segment.start_index - run_start + 1;
        if run_points > params.min_run_points || segment.grade.abs() > params.break_grade_percent {
            runs.push(TerrainRun::new(
                current_class,
                points,
                &segments,
                run_start,
                segment.start_index,
            ));
            current_class = class;
            run_start = segment.start_index;
        }
    }

    runs.push(TerrainRun::new(
        current_class,
        points,
        &segments,
        run_start,
        points.len() - 1,
    ));

    Estimate::Value(runs)
}

/// Totals for one class of terrain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ClassTotals {
    pub runs: usize,
    pub distance: Km,
    /// Net elevation change for ascents and flats. For descents this is the
    /// elevation lost, as a positive number.
    pub elevation: Metres,
    pub estimated_time: f64,
}

/// Aggregate figures for each class of terrain across a list of runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TerrainSummary {
    pub ascent: ClassTotals,
    pub descent: ClassTotals,
    pub flat: ClassTotals,
}

impl TerrainSummary {
    pub fn from_runs(runs: &[TerrainRun]) -> Self {
        let mut summary = Self::default();

        for run in runs {
            let (totals, elevation) = match run.class {
                TerrainClass::Ascent => (&mut summary.ascent, run.elevation_change),
                TerrainClass::Descent => (&mut summary.descent, run.elevation_change.abs()),
                TerrainClass::Flat => (&mut summary.flat, run.elevation_change),
            };

            totals.runs += 1;
            totals.distance += run.distance;
            totals.elevation += elevation;
            totals.estimated_time += run.estimated_time;
        }

        summary
    }

    pub fn get(&self, class: TerrainClass) -> &ClassTotals {
        match class {
            TerrainClass::Ascent => &self.ascent,
            TerrainClass::Descent => &self.descent,
            TerrainClass::Flat => &self.flat,
        }
    }
}
