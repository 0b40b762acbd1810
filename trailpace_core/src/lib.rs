//! Pace and time estimation for a route described by an elevation profile.
//!
//! The profile is run through the grade model one segment at a time. From
//! that we can estimate a finishing time, solve for the pace needed to hit a
//! target time, interpolate checkpoints and split the route into terrain
//! runs.

pub mod checkpoint;
pub mod error;
pub mod estimate;
pub mod excel;
pub mod formatting;
pub mod grade;
pub mod model;
mod model_impls;
pub mod profile_reader;
pub mod report;
pub mod solver;
pub mod terrain;
pub mod timing;
