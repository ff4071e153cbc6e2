//! Geographic primitives: positions, the service area, coordinate repair, and distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG), used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// First value of a raw pair below this is taken as a longitude.
const SWAPPED_LAT_CEILING: f64 = 15.0;
/// Second value of a raw pair above this is taken as a latitude.
const SWAPPED_LON_FLOOR: f64 = 45.0;

/// Bounding box of the Heilbronn grid region.
///
/// Every real facility sits near latitude 49 and longitude 9, which is what
/// makes the swap heuristic in [`normalize_coordinates`] unambiguous: inside
/// this box a latitude is never below 15 and a longitude never above 45.
pub const HEILBRONN_SERVICE_AREA: ServiceArea = ServiceArea {
    min_lat: 48.8,
    max_lat: 49.5,
    min_lon: 8.7,
    max_lon: 9.8,
};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees north).
    pub lat: f64,
    /// Longitude (degrees east).
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a point from a raw source pair, repairing swapped order.
    ///
    /// Returns `None` when either value is missing or not finite.
    pub fn from_raw_pair(first: Option<f64>, second: Option<f64>) -> Option<Self> {
        let (a, b) = (first?, second?);
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let (lat, lon) = normalize_coordinates(a, b);
        Some(Self { lat, lon })
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Latitude/longitude rectangle requests must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceArea {
    /// Southern edge (degrees).
    pub min_lat: f64,
    /// Northern edge (degrees).
    pub max_lat: f64,
    /// Western edge (degrees).
    pub min_lon: f64,
    /// Eastern edge (degrees).
    pub max_lon: f64,
}

impl Default for ServiceArea {
    fn default() -> Self {
        HEILBRONN_SERVICE_AREA
    }
}

impl ServiceArea {
    /// Returns `true` when `point` lies inside the box (edges inclusive).
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}

/// Returns `(latitude, longitude)` for a raw source pair.
///
/// Some source sheets store longitude before latitude. A pair whose first
/// value is below 15 and whose second value is above 45 is exchanged; any
/// other pair is returned unchanged, so the function is idempotent.
pub fn normalize_coordinates(first: f64, second: f64) -> (f64, f64) {
    if first < SWAPPED_LAT_CEILING && second > SWAPPED_LON_FLOOR {
        (second, first)
    } else {
        (first, second)
    }
}

/// Haversine great-circle distance in meters between two positions.
///
/// Spherical approximation with [`EARTH_RADIUS_M`]; at regional scale it
/// stays within half a percent of the WGS84 ellipsoidal distance.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
