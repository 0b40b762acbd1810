//! Bundles every calculation for one profile into a single value, which is
//! what the CLI prints and the spreadsheet writer consumes.

use log::debug;
use logging_timer::time;
use serde::Serialize;

use crate::{
    checkpoint::{compute_checkpoints, Checkpoint},
    error::NoEstimateReason,
    model::{ElevationSummary, Km, MinPerKm, Profile, Segment},
    solver::{solve_pace_with, PaceSolution, SolverParameters},
    terrain::{segment_terrain, TerrainRun, TerrainSummary},
    timing::{segment_paces, total_minutes},
};

/// How the base pace for a report is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PaceInput {
    /// Use this flat-ground pace, in min/km.
    Pace(MinPerKm),
    /// Solve for the pace that finishes in this many minutes.
    TargetMinutes(f64),
}

#[derive(Debug, Clone, Serialize)]
pub struct PacingReport {
    /// Where the profile came from, for display.
    pub name: String,
    pub elevation: ElevationSummary,
    pub input: PaceInput,
    /// Present when the pace was solved from a target time.
    pub solution: Option<PaceSolution>,
    /// The flat-ground pace everything else was computed with.
    pub base_pace: MinPerKm,
    pub estimated_minutes: f64,
    pub segments: Vec<Segment>,
    pub checkpoints: Vec<Checkpoint>,
    pub terrain_runs: Vec<TerrainRun>,
    pub terrain_summary: TerrainSummary,
}

impl PacingReport {
    /// Runs every calculation against the profile.
    #[time]
    pub fn build(
        profile: &Profile,
        input: PaceInput,
        checkpoint_distances: &[Km],
        solver: &SolverParameters,
    ) -> Result<Self, NoEstimateReason> {
        let points = &profile.points;

        let (base_pace, solution) = match input {
            PaceInput::Pace(pace) => (pace, None),
            PaceInput::TargetMinutes(target) => {
                let solution = solve_pace_with(points, target, solver).into_result()?;
                (solution.pace, Some(solution))
            }
        };

        let segments = segment_paces(points, base_pace).into_result()?;
        let checkpoints = compute_checkpoints(points, base_pace, checkpoint_distances).into_result()?;
        let terrain_runs = segment_terrain(points, base_pace).into_result()?;
        let terrain_summary = TerrainSummary::from_runs(&terrain_runs);

        let name = profile
            .filename
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "profile".to_owned());

        debug!(
            "Built report for {name}: {} segments, {} checkpoints, {} terrain runs",
            segments.len(),
            checkpoints.len(),
            terrain_runs.len()
        );

        Ok(Self {
            name,
            elevation: profile.elevation_summary(),
            input,
            solution,
            base_pace,
            estimated_minutes: total_minutes(&segments),
            segments,
            checkpoints,
            terrain_runs,
            terrain_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfilePoint;

    fn example() -> Profile {
        Profile::with_filename(
            vec![
                ProfilePoint::new(0.0, 100.0),
                ProfilePoint::new(1.0, 150.0),
                ProfilePoint::new(2.0, 100.0),
                ProfilePoint::new(5.0, 100.0),
            ],
            "hills.json",
        )
    }

    #[test]
    fn test_build_with_pace() {
        let r = PacingReport::build(&example(), PaceInput::Pace(5.0), &[2.0], &SolverParameters::default())
            .unwrap();
        assert_eq!(r.name, "hills.json");
        assert!(r.solution.is_none());
        assert_eq!(r.base_pace, 5.0);
        assert!((r.estimated_minutes - 25.0).abs() < 1e-9);
        assert_eq!(r.segments.len(), 3);
        assert_eq!(r.checkpoints.len(), 2);
        assert!(!r.terrain_runs.is_empty());
        assert_eq!(r.elevation.total_ascent, 50.0);
    }

    #[test]
    fn test_build_with_target() {
        let r = PacingReport::build(
            &example(),
            PaceInput::TargetMinutes(50.0),
            &[],
            &SolverParameters::default(),
        )
        .unwrap();
        let solution = r.solution.unwrap();
        assert!(solution.converged);
        assert_eq!(r.base_pace, solution.pace);
        assert!((r.estimated_minutes - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_build_reports_no_estimate() {
        let p = Profile::new(vec![ProfilePoint::new(0.0, 0.0)]);
        let err = PacingReport::build(&p, PaceInput::Pace(5.0), &[], &SolverParameters::default())
            .unwrap_err();
        assert_eq!(err, NoEstimateReason::TooFewPoints(1));
    }
}
