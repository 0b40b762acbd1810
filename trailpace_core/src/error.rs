use thiserror::Error;

/// Errors raised while validating or parsing caller input. The estimators
/// themselves never return these; they report an `Estimate::NoEstimate`
/// instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PacingError {
    #[error("profile point {index} has a non-finite distance or elevation")]
    NonFinitePoint { index: usize },
    #[error("profile distance decreases at point {index}: {previous} km -> {current} km")]
    DecreasingDistance {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("profile must start at distance 0, found {0} km")]
    NonZeroStart(f64),
    #[error("invalid time '{0}', expected H:MM")]
    InvalidTime(String),
    #[error("invalid pace '{0}', expected M:SS")]
    InvalidPace(String),
    #[error("invalid profile data: {0}")]
    InvalidProfile(String),
}

/// Why an estimator could not produce a value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NoEstimateReason {
    #[error("the profile has {0} points, at least 2 are required")]
    TooFewPoints(usize),
    #[error("the profile has zero total distance")]
    ZeroDistance,
    #[error("the target time must be a positive number of minutes")]
    NonPositiveTarget,
    #[error("the base pace must be a positive number of minutes per km")]
    NonPositivePace,
}
