//! Geographic locations and great-circle distance.

use std::fmt;

/// Mean earth radius used by [`haversine`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Location {
    /// Create a location from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other`, in kilometres.
    pub fn distance(&self, other: &Self) -> f64 {
        haversine(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location(latitude={},longitude={})",
            self.latitude, self.longitude
        )
    }
}

/// Haversine distance between two points given in degrees, in kilometres.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let sin_lat = ((lat2 - lat1) * 0.5).sin().powi(2);
    let sin_lon = ((lon2 - lon1) * 0.5).sin().powi(2);
    let central = sin_lon.mul_add(lat1.cos() * lat2.cos(), sin_lat).sqrt().asin();
    2.0 * EARTH_RADIUS_KM * central
}
