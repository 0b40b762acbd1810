//! Works out the flat-ground pace needed to finish a route in a target time,
//! by repeatedly running the time accumulator and correcting the pace.

use log::{debug, warn};
use logging_timer::time;
use serde::Serialize;

use crate::{
    error::NoEstimateReason,
    estimate::Estimate,
    model::{MinPerKm, ProfilePoint},
    timing::estimate_time_unchecked,
};

/// These are the parameters that control the pace solver.
///
/// The defaults (10 iterations, half a minute of tolerance, a damping of
/// 0.5) are kept for compatibility with earlier estimates. The damping in
/// particular is an arbitrary choice: with the current grade model the total
/// time is linear in the pace, so an undamped step would land exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolverParameters {
    /// Upper limit on the number of correction steps.
    pub max_iterations: usize,
    /// Stop as soon as the estimated time is within this many minutes of
    /// the target.
    pub tolerance_minutes: f64,
    /// Fraction of the proportional correction applied on each step.
    pub damping: f64,
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance_minutes: 0.5,
            damping: 0.5,
        }
    }
}

/// The result of solving for a pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaceSolution {
    /// The flat-ground pace reached.
    pub pace: MinPerKm,
    /// The total time the profile takes at `pace`.
    pub estimated_minutes: f64,
    /// How many times the accumulator was evaluated.
    pub iterations: usize,
    /// Whether `estimated_minutes` is within the tolerance of the target.
    /// When false the pace is still the best one found, but it may be some
    /// way off.
    pub converged: bool,
}

/// Finds the base pace that makes the profile take `target_minutes`, using
/// the default parameters.
pub fn solve_pace(points: &[ProfilePoint], target_minutes: f64) -> Estimate<PaceSolution> {
    solve_pace_with(points, target_minutes, &SolverParameters::default())
}

/// Finds the base pace that makes the profile take `target_minutes`.
///
/// Starts by assuming the route is flat, then on every iteration applies
/// `pace *= 1 - damping * (diff / estimated)`. If the tolerance is never met
/// the last pace is still returned, with `converged` set to false.
#[time]
pub fn solve_pace_with(
    points: &[ProfilePoint],
    target_minutes: f64,
    params: &SolverParameters,
) -> Estimate<PaceSolution> {
    if points.len() < 2 {
        return Estimate::NoEstimate(NoEstimateReason::TooFewPoints(points.len()));
    }

    if !(target_minutes.is_finite() && target_minutes > 0.0) {
        return Estimate::NoEstimate(NoEstimateReason::NonPositiveTarget);
    }

    let total_distance = points[points.len() - 1].distance - points[0].distance;
    if !(total_distance > 0.0) {
        return Estimate::NoEstimate(NoEstimateReason::ZeroDistance);
    }

    let mut pace = target_minutes / total_distance;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        let estimated = estimate_time_unchecked(points, pace);
        iterations += 1;
        let diff = estimated - target_minutes;

        if diff.abs() < params.tolerance_minutes {
            converged = true;
            break;
        }

        pace *= 1.0 - params.damping * (diff / estimated);
        debug!("solve_pace: iteration {iterations}, estimated={estimated:.3} min, new pace={pace:.4} min/km");
    }

    // The loop may have exhausted its iterations straight after a correction,
    // in which case the time at the final pace has not been measured yet.
    let estimated_minutes = estimate_time_unchecked(points, pace);
    if !converged {
        converged = (estimated_minutes - target_minutes).abs() < params.tolerance_minutes;
    }

    if !converged {
        warn!(
            "solve_pace: did not converge after {iterations} iterations, \
             pace {pace:.4} min/km gives {estimated_minutes:.2} min against a target of {target_minutes:.2} min"
        );
    }

    Estimate::Value(PaceSolution {
        pace,
        estimated_minutes,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::estimate_time;

    fn points(samples: &[(f64, f64)]) -> Vec<ProfilePoint> {
        samples
            .iter()
            .map(|&(d, e)| ProfilePoint::new(d, e))
            .collect()
    }

    #[test]
    fn test_flat_route_converges_immediately() {
        let p = points(&[(0.0, 50.0), (10.0, 50.0)]);
        let s = solve_pace(&p, 60.0).value().unwrap();
        assert!((s.pace - 6.0).abs() < 1e-9);
        assert_eq!(s.iterations, 1);
        assert!(s.converged);
    }

    #[test]
    fn test_hilly_route_reconverges() {
        let p = points(&[
            (0.0, 100.0),
            (2.0, 300.0),
            (3.0, 420.0),
            (5.0, 200.0),
            (8.0, 150.0),
            (10.0, 150.0),
        ]);
        let s = solve_pace(&p, 75.0).value().unwrap();
        assert!(s.converged);
        let t = estimate_time(&p, s.pace).value().unwrap();
        assert!((t - 75.0).abs() < 0.5);
        assert!((s.estimated_minutes - t).abs() < 1e-9);
    }

    #[test]
    fn test_non_convergence_is_reported() {
        // Steep climb throughout, so the flat guess is 50% out and a single
        // damped step cannot get within a tiny tolerance.
        let p = points(&[(0.0, 0.0), (10.0, 3000.0)]);
        let params = SolverParameters {
            max_iterations: 1,
            tolerance_minutes: 0.001,
            damping: 0.5,
        };
        let s = solve_pace_with(&p, 60.0, &params).value().unwrap();
        assert!(!s.converged);
        assert_eq!(s.iterations, 1);
        // 6.0 * (1 - 0.5 * (90 - 60) / 90)
        assert!((s.pace - 5.0).abs() < 1e-9);
        assert!((s.estimated_minutes - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        let p = points(&[(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(
            solve_pace(&p, 0.0),
            Estimate::NoEstimate(NoEstimateReason::NonPositiveTarget)
        );
        assert_eq!(
            solve_pace(&p, -30.0),
            Estimate::NoEstimate(NoEstimateReason::NonPositiveTarget)
        );
        assert_eq!(
            solve_pace(&p[..1], 30.0),
            Estimate::NoEstimate(NoEstimateReason::TooFewPoints(1))
        );

        let p = points(&[(0.0, 0.0), (0.0, 10.0)]);
        assert_eq!(
            solve_pace(&p, 30.0),
            Estimate::NoEstimate(NoEstimateReason::ZeroDistance)
        );
    }
}
