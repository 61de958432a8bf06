// src/trail/point.rs
//! Geographic coordinate value type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single latitude/longitude pair in decimal degrees.
///
/// No range checks are made: whatever the fix source reports is carried
/// through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in meters (haversine)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(37.0, -122.0);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        // ~111.19 km per degree on a 6371 km sphere
        assert!((a.distance_to(&b) - 111_195.0).abs() < 5.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(37.0, -122.0);
        let b = GeoPoint::new(37.1, -122.1);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-6);
    }

    #[test]
    fn test_display_and_tuple_conversion() {
        let p: GeoPoint = (37.1, -122.1).into();
        assert_eq!(p, GeoPoint::new(37.1, -122.1));
        assert_eq!(p.to_string(), "(37.100000, -122.100000)");
    }
}
