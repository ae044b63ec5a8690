//! Geographic coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`haversine_km`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Inclusive latitude bounds in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Inclusive longitude bounds in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Validation errors returned by [`Coordinate::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateValidationError {
    /// Latitude was not finite or fell outside [-90, 90].
    #[error("latitude must be between -90 and 90 degrees, got {value}")]
    LatitudeOutOfRange { value: f64 },
    /// Longitude was not finite or fell outside [-180, 180].
    #[error("longitude must be between -180 and 180 degrees, got {value}")]
    LongitudeOutOfRange { value: f64 },
}

/// A (latitude, longitude) pair in decimal degrees.
///
/// [`Coordinate::new`] performs no range checks so distance computation
/// stays a pure passthrough; callers at the request boundary use
/// [`Coordinate::try_new`].
///
/// # Examples
/// ```
/// use geopost::domain::Coordinate;
///
/// let olin = Coordinate::try_new(42.12346, -76.54322).expect("valid coordinate");
/// assert_eq!(olin.latitude(), 42.12346);
/// assert!(Coordinate::try_new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate without validating its range.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateValidationError> {
        // `contains` is false for NaN, so non-finite input is rejected too.
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(CoordinateValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(CoordinateValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Haversine great-circle distance between two coordinates, in kilometres.
///
/// Pure and deterministic; `haversine_km(a, b) == haversine_km(b, a)` and
/// `haversine_km(a, a) == 0.0`.
///
/// # Examples
/// ```
/// use geopost::domain::{Coordinate, haversine_km};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let east = Coordinate::new(0.0, 10.0);
/// let distance = haversine_km(&origin, &east);
/// assert!((distance - 1111.949).abs() < 0.001);
/// ```
#[must_use]
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding near antipodes can push the term a hair past 1.0.
    let half_chord = half_chord.clamp(0.0, 1.0);
    let central_angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_KM * central_angle
}

#[cfg(test)]
mod tests {
    //! Regression coverage for coordinate validation and haversine distance.
    use super::*;
    use rstest::rstest;

    const EPSILON_KM: f64 = 1e-9;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(42.12345, -76.54321)]
    #[case(-89.9, 179.9)]
    #[case(90.0, -180.0)]
    fn distance_to_self_is_zero(#[case] latitude: f64, #[case] longitude: f64) {
        let point = Coordinate::new(latitude, longitude);
        assert!(haversine_km(&point, &point).abs() < EPSILON_KM);
    }

    #[rstest]
    #[case((0.0, 0.0), (0.0, 10.0))]
    #[case((42.12345, -76.54321), (42.44857, -76.48399))]
    #[case((-33.8688, 151.2093), (51.5074, -0.1278))]
    #[case((89.0, 0.0), (-89.0, 180.0))]
    fn distance_is_symmetric_and_non_negative(#[case] a: (f64, f64), #[case] b: (f64, f64)) {
        let a = Coordinate::new(a.0, a.1);
        let b = Coordinate::new(b.0, b.1);
        let forward = haversine_km(&a, &b);
        let backward = haversine_km(&b, &a);
        assert!(forward >= 0.0);
        assert!((forward - backward).abs() < EPSILON_KM);
    }

    #[rstest]
    fn equator_degree_matches_reference() {
        let distance = haversine_km(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0));
        assert!((distance - 111.194_926_644_558_7).abs() < 1e-6);
    }

    #[rstest]
    fn antipodal_points_are_half_circumference_apart() {
        let distance = haversine_km(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[rstest]
    fn out_of_range_input_still_produces_a_number() {
        let distance = haversine_km(&Coordinate::new(120.0, 400.0), &Coordinate::new(0.0, 0.0));
        assert!(distance.is_finite());
    }

    #[rstest]
    #[case(90.1, 0.0)]
    #[case(-90.1, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    fn try_new_rejects_bad_latitude(#[case] latitude: f64, #[case] longitude: f64) {
        let err = Coordinate::try_new(latitude, longitude).expect_err("latitude rejected");
        assert!(matches!(
            err,
            CoordinateValidationError::LatitudeOutOfRange { .. }
        ));
    }

    #[rstest]
    #[case(0.0, 180.5)]
    #[case(0.0, -181.0)]
    #[case(0.0, f64::NAN)]
    fn try_new_rejects_bad_longitude(#[case] latitude: f64, #[case] longitude: f64) {
        let err = Coordinate::try_new(latitude, longitude).expect_err("longitude rejected");
        assert!(matches!(
            err,
            CoordinateValidationError::LongitudeOutOfRange { .. }
        ));
    }

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(42.44301, -76.48410)]
    fn try_new_accepts_boundaries(#[case] latitude: f64, #[case] longitude: f64) {
        let coordinate = Coordinate::try_new(latitude, longitude).expect("valid coordinate");
        assert_eq!(coordinate.latitude(), latitude);
        assert_eq!(coordinate.longitude(), longitude);
    }
}
