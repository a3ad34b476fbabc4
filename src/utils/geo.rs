use crate::constants::{MAX_RADIUS_METERS, MIN_RADIUS_METERS};
use crate::models::{Coordinate, Viewport};

const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Great-circle distance between two points, in meters.
pub trait DistanceMetric: Send + Sync {
    fn distance_meters(&self, a: Coordinate, b: Coordinate) -> f64;
}

/// Spherical earth with the WGS84 equatorial radius, the same model the
/// browser maps library uses for `computeDistanceBetween`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance_meters(&self, a: Coordinate, b: Coordinate) -> f64 {
        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();
        let d_lat = (b.lat - a.lat).to_radians();
        let d_lng = (b.lng - a.lng).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
    }
}

pub fn clamp_radius(meters: f64) -> u32 {
    if !meters.is_finite() {
        return MIN_RADIUS_METERS;
    }
    let rounded = meters.round().max(0.0);
    (rounded as u64).clamp(MIN_RADIUS_METERS as u64, MAX_RADIUS_METERS as u64) as u32
}

/// Half the viewport diagonal: distance from its center to the north-east corner.
pub fn viewport_span_meters(viewport: &Viewport, metric: &dyn DistanceMetric) -> f64 {
    metric.distance_meters(viewport.center(), viewport.north_east())
}

/// The viewport wins over the radius control when it is known.
pub fn effective_radius(
    selected: Option<u32>,
    viewport: Option<&Viewport>,
    default_radius: u32,
    metric: &dyn DistanceMetric,
) -> f64 {
    match viewport {
        Some(viewport) => viewport_span_meters(viewport, metric),
        None => f64::from(selected.unwrap_or(default_radius)),
    }
}
