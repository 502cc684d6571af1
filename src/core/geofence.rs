//! Great-circle distance and the circular geofence around a session anchor.

use crate::models::coordinates::Coordinates;

/// Mean Earth radius (IUGG), in meters.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Default geofence radius, in meters.
pub const DEFAULT_RADIUS_M: f64 = 50.0;

/// Haversine distance between two points, in meters.
pub fn haversine_distance_m(a: &Coordinates, b: &Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // clamp: rounding can push h slightly above 1 for antipodal points
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub anchor: Coordinates,
    pub radius_m: f64,
}

impl Geofence {
    pub fn new(anchor: Coordinates, radius_m: f64) -> Self {
        Self { anchor, radius_m }
    }

    pub fn distance_to(&self, point: &Coordinates) -> f64 {
        haversine_distance_m(&self.anchor, point)
    }

    /// A point exactly on the boundary is inside.
    pub fn admits(&self, distance_m: f64) -> bool {
        distance_m <= self.radius_m
    }
}
