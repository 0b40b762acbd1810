use std::path::PathBuf;

use geo::{point, GeodesicDistance, Point};
use log::debug;
use logging_timer::time;

use crate::{
    error::PacingError,
    model::{Coordinate, ElevationSummary, Km, Metres, Profile, ProfilePoint},
};

impl ProfilePoint {
    pub fn new(distance: Km, elevation: Metres) -> Self {
        Self {
            distance,
            elevation,
        }
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64, elevation: Option<Metres>) -> Self {
        Self {
            lat,
            lon,
            elevation,
        }
    }

    /// Makes a geo-Point based on the lat-lon coordinates of this point.
    /// n.b. x=lon, y=lat. If you do it the other way round the
    /// distances are wrong - a lot wrong.
    pub fn as_geo_point(&self) -> Point {
        point! { x: self.lon, y: self.lat }
    }
}

impl From<Vec<ProfilePoint>> for Profile {
    fn from(points: Vec<ProfilePoint>) -> Self {
        Self::new(points)
    }
}

impl Profile {
    pub fn new(points: Vec<ProfilePoint>) -> Self {
        Self {
            filename: None,
            points,
        }
    }

    pub fn with_filename<P>(points: Vec<ProfilePoint>, filename: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let mut v = Self::new(points);
        v.filename = Some(filename.into());
        v
    }

    /// Builds a profile from geographic samples by accumulating the geodesic
    /// distance between consecutive coordinates. Missing elevations are
    /// taken to be 0.
    #[time]
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        let mut points = Vec::with_capacity(coordinates.len());
        let mut running_metres = 0.0;
        let mut prev: Option<Point> = None;

        for c in coordinates {
            let p = c.as_geo_point();
            if let Some(prev) = prev {
                running_metres += prev.geodesic_distance(&p);
            }
            points.push(ProfilePoint::new(
                running_metres / 1000.0,
                c.elevation.unwrap_or_default(),
            ));
            prev = Some(p);
        }

        debug!(
            "Converted {} coordinates into a profile of {:.3} km",
            points.len(),
            running_metres / 1000.0
        );

        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the distance of the last point, or 0 for an empty profile.
    pub fn total_distance_km(&self) -> Km {
        self.points.last().map(|p| p.distance).unwrap_or_default()
    }

    /// Checks that every value is finite, that the route starts at distance
    /// 0 and that the distance never goes backwards. Too few points is not
    /// an error here, the estimators report that themselves.
    pub fn validate(&self) -> Result<(), PacingError> {
        for (index, p) in self.points.iter().enumerate() {
            if !(p.distance.is_finite() && p.elevation.is_finite()) {
                return Err(PacingError::NonFinitePoint { index });
            }
        }

        if let Some(first) = self.points.first() {
            if first.distance != 0.0 {
                return Err(PacingError::NonZeroStart(first.distance));
            }
        }

        for (index, pair) in self.points.windows(2).enumerate() {
            if pair[1].distance < pair[0].distance {
                return Err(PacingError::DecreasingDistance {
                    index: index + 1,
                    previous: pair[0].distance,
                    current: pair[1].distance,
                });
            }
        }

        Ok(())
    }

    /// Returns the headline elevation figures. An empty profile gives
    /// all zeros.
    pub fn elevation_summary(&self) -> ElevationSummary {
        if self.points.is_empty() {
            return ElevationSummary::default();
        }

        let mut summary = ElevationSummary {
            total_distance: self.total_distance_km(),
            min_elevation: f64::INFINITY,
            max_elevation: f64::NEG_INFINITY,
            total_ascent: 0.0,
            total_descent: 0.0,
        };

        for p in &self.points {
            summary.min_elevation = summary.min_elevation.min(p.elevation);
            summary.max_elevation = summary.max_elevation.max(p.elevation);
        }

        for pair in self.points.windows(2) {
            let delta = pair[1].elevation - pair[0].elevation;
            if delta > 0.0 {
                summary.total_ascent += delta;
            } else {
                summary.total_descent += delta.abs();
            }
        }

        summary
    }
}
