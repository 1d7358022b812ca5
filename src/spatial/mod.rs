//! Great-circle geometry and spatial indexing

pub mod index;

pub use index::SpatialIndex;

/// Mean Earth radius in miles, matching the constant the analytics were
/// originally tuned against.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A point on the sphere, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in radians.
    pub lat: f64,
    /// Longitude in radians.
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point from decimal-degree coordinates.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat: lat_deg.to_radians(),
            lon: lon_deg.to_radians(),
        }
    }
}

/// Haversine great-circle distance between two points, in miles.
///
/// Symmetric and triangle-inequality-respecting, which the spatial index
/// relies on for pruning.
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = b.lat - a.lat;
    let dlon = b.lon - a.lon;

    let h = (dlat / 2.0).sin().powi(2) + a.lat.cos() * b.lat.cos() * (dlon / 2.0).sin().powi(2);

    // Floating error can push h a hair outside [0, 1] for antipodal or
    // coincident points; clamp before asin.
    let h = h.clamp(0.0, 1.0);

    2.0 * h.sqrt().asin() * EARTH_RADIUS_MILES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::from_degrees(41.8781, -87.6298);
        let b = GeoPoint::from_degrees(41.8500, -87.6500);
        let ab = haversine_miles(a, b);
        let ba = haversine_miles(b, a);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0);
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        let a = GeoPoint::from_degrees(41.8781, -87.6298);
        assert_eq!(haversine_miles(a, a), 0.0);
    }

    #[test]
    fn one_degree_longitude_at_equator() {
        let a = GeoPoint::from_degrees(0.0, 0.0);
        let b = GeoPoint::from_degrees(0.0, 1.0);
        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((haversine_miles(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn triangle_inequality_holds() {
        let a = GeoPoint::from_degrees(41.88, -87.63);
        let b = GeoPoint::from_degrees(41.90, -87.65);
        let c = GeoPoint::from_degrees(41.85, -87.60);
        let ab = haversine_miles(a, b);
        let bc = haversine_miles(b, c);
        let ac = haversine_miles(a, c);
        assert!(ac <= ab + bc + 1e-9);
    }
}
