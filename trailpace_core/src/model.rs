use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Distances along the route are always in kilometres.
pub type Km = f64;
/// Elevations and elevation changes are always in metres.
pub type Metres = f64;
/// A pace is minutes per kilometre.
pub type MinPerKm = f64;
/// A grade is a signed percentage: positive is ascent, negative is descent.
pub type Percent = f64;

/// One sample of a route: how far along it is, and how high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Cumulative distance from the start of the route, in km.
    pub distance: Km,
    /// Elevation above sea level, in metres.
    pub elevation: Metres,
}

/// An ordered sequence of samples describing a route, from start to finish.
/// Distances are non-decreasing and the first one is 0. A Profile only
/// becomes useful for estimation once it has at least 2 points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// The filename field is not part of the profile data, but it is
    /// convenient to have it so it can be used as an identifier when
    /// reporting.
    #[serde(skip)]
    pub filename: Option<PathBuf>,
    /// The samples, in route order.
    pub points: Vec<ProfilePoint>,
}

/// The interval between two consecutive ProfilePoints, together with
/// everything the pace model derives for it. A list of these is the
/// arena that checkpoints and terrain runs refer back into by index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Index of the ProfilePoint the segment starts at. The segment ends
    /// at `start_index + 1`, and this is also the index of the segment
    /// itself in the list returned by `segment_paces`.
    pub start_index: usize,
    /// Cumulative distance at the start of the segment.
    pub start_distance: Km,
    /// Cumulative distance at the end of the segment.
    pub end_distance: Km,
    /// Length of the segment.
    pub distance: Km,
    /// Elevation at the end minus elevation at the start.
    pub elevation_change: Metres,
    /// Grade of the segment, 0 for a zero-length segment.
    pub grade: Percent,
    /// Multiplier applied to the flat-ground pace for this grade.
    pub pace_factor: f64,
    /// The base pace scaled by `pace_factor`.
    pub pace: MinPerKm,
    /// Time needed to cover the segment, in minutes.
    pub time_minutes: f64,
}

/// Headline elevation figures for a whole profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ElevationSummary {
    pub total_distance: Km,
    pub min_elevation: Metres,
    pub max_elevation: Metres,
    /// Sum of all the positive elevation changes.
    pub total_ascent: Metres,
    /// Sum of all the negative elevation changes, as a positive number.
    pub total_descent: Metres,
}

/// A raw geographic sample, before it has been turned into a ProfilePoint.
/// This is what a GPX trackpoint boils down to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// The latitude, in decimal degrees (WGS84).
    pub lat: f64,
    /// The longitude, in decimal degrees (WGS84).
    pub lon: f64,
    /// Elevation, in metres, if the device recorded one.
    pub elevation: Option<Metres>,
}
