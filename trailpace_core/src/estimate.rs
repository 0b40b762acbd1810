use serde::Serialize;

use crate::{error::NoEstimateReason, model::ProfilePoint};

/// The outcome of one of the pacing calculations. A degenerate input is
/// reported as `NoEstimate` so that a genuine zero (for example a route of
/// zero length) can be told apart from "could not calculate".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Estimate<T> {
    Value(T),
    NoEstimate(NoEstimateReason),
}

impl<T> Estimate<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Estimate::Value(_))
    }

    /// Returns the value, if there is one.
    pub fn value(self) -> Option<T> {
        match self {
            Estimate::Value(v) => Some(v),
            Estimate::NoEstimate(_) => None,
        }
    }

    pub fn as_ref(&self) -> Estimate<&T> {
        match self {
            Estimate::Value(v) => Estimate::Value(v),
            Estimate::NoEstimate(reason) => Estimate::NoEstimate(*reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Estimate<U> {
        match self {
            Estimate::Value(v) => Estimate::Value(f(v)),
            Estimate::NoEstimate(reason) => Estimate::NoEstimate(reason),
        }
    }

    /// Converts into a `Result` so that callers can use `?`.
    pub fn into_result(self) -> Result<T, NoEstimateReason> {
        match self {
            Estimate::Value(v) => Ok(v),
            Estimate::NoEstimate(reason) => Err(reason),
        }
    }
}

/// The checks shared by every calculation that takes a base pace.
pub(crate) fn check_points_and_pace(
    points: &[ProfilePoint],
    base_pace: f64,
) -> Result<(), NoEstimateReason> {
    if points.len() < 2 {
        return Err(NoEstimateReason::TooFewPoints(points.len()));
    }

    if !(base_pace.is_finite() && base_pace > 0.0) {
        return Err(NoEstimateReason::NonPositivePace);
    }

    Ok(())
}
