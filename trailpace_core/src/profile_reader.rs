use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use logging_timer::time;
use serde::Deserialize;

use crate::{
    error::PacingError,
    model::{Coordinate, Profile, ProfilePoint},
};

/// A profile file is a JSON array in which every element is either an
/// already-measured sample or a raw coordinate. The two kinds cannot be
/// mixed in one file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Measured(ProfilePoint),
    Geographic(Coordinate),
}

/// Reads and validates a profile from a JSON file.
#[time]
pub fn read_profile_from_file<P: AsRef<Path>>(input_file: P) -> Result<Profile> {
    let input_file = input_file.as_ref();
    info!("Reading profile file {:?}", input_file);
    let contents = std::fs::read(input_file)
        .with_context(|| format!("Failed to read {:?}", input_file))?;
    let mut profile = read_profile_from_slice(&contents)
        .with_context(|| format!("Failed to load a profile from {:?}", input_file))?;
    profile.filename = Some(input_file.to_owned());
    Ok(profile)
}

/// Reads and validates a profile from JSON data.
pub fn read_profile_from_slice(data: &[u8]) -> Result<Profile> {
    let raw: Vec<RawPoint> = serde_json::from_slice(data)
        .map_err(|e| PacingError::InvalidProfile(e.to_string()))?;

    let profile = if raw.iter().all(|p| matches!(p, RawPoint::Measured(_))) {
        let points = raw
            .into_iter()
            .filter_map(|p| match p {
                RawPoint::Measured(m) => Some(m),
                RawPoint::Geographic(_) => None,
            })
            .collect();
        Profile::new(points)
    } else if raw.iter().all(|p| matches!(p, RawPoint::Geographic(_))) {
        let coordinates: Vec<Coordinate> = raw
            .into_iter()
            .filter_map(|p| match p {
                RawPoint::Geographic(c) => Some(c),
                RawPoint::Measured(_) => None,
            })
            .collect();
        Profile::from_coordinates(&coordinates)
    } else {
        return Err(PacingError::InvalidProfile(
            "a profile cannot mix distance samples with lat/lon coordinates".to_owned(),
        )
        .into());
    };

    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_measured_points() {
        let json = br#"[
            {"distance": 0.0, "elevation": 100.0},
            {"distance": 1.0, "elevation": 150.0},
            {"distance": 2.5, "elevation": 120.0}
        ]"#;
        let p = read_profile_from_slice(json).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.points[1], ProfilePoint::new(1.0, 150.0));
        assert_eq!(p.total_distance_km(), 2.5);
        assert!(p.filename.is_none());
    }

    #[test]
    fn test_read_coordinates() {
        let json = br#"[
            {"lat": 45.0, "lon": 7.0, "elevation": 300.0},
            {"lat": 45.01, "lon": 7.0},
            {"lat": 45.02, "lon": 7.0, "elevation": 340.0}
        ]"#;
        let p = read_profile_from_slice(json).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.points[0].distance, 0.0);
        assert!(p.points[2].distance > 2.2);
        assert_eq!(p.points[1].elevation, 0.0);
    }

    #[test]
    fn test_mixed_points_are_rejected() {
        let json = br#"[
            {"distance": 0.0, "elevation": 100.0},
            {"lat": 45.01, "lon": 7.0}
        ]"#;
        let err = read_profile_from_slice(json).unwrap_err();
        assert!(err.to_string().contains("cannot mix"));
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let json = br#"[
            {"distance": 0.0, "elevation": 100.0},
            {"distance": 2.0, "elevation": 100.0},
            {"distance": 1.0, "elevation": 100.0}
        ]"#;
        let err = read_profile_from_slice(json).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PacingError>(),
            Some(&PacingError::DecreasingDistance {
                index: 2,
                previous: 2.0,
                current: 1.0
            })
        );

        assert!(read_profile_from_slice(b"not json").is_err());
    }
}
