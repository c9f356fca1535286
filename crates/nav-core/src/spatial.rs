//! Spatial math for distance calculations and containment tests.

use crate::models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon) / 1000.0
}

/// Sum of great-circle leg lengths along a path, in kilometers.
pub fn path_distance_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|leg| haversine_km(leg[0], leg[1])).sum()
}

/// Check if a point is inside a ring of vertices.
/// Uses ray casting; the ring may be open or closed.
pub fn point_in_ring(point: Coordinate, ring: &[Coordinate]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (lat, lon) = (point.lat, point.lon);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let yi = ring[i].lat;
        let xi = ring[i].lon;
        let yj = ring[j].lat;
        let xj = ring[j].lon;

        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box containing every point. `None` for an empty slice.
    pub fn around(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for point in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(point.lat);
            bounds.max_lat = bounds.max_lat.max(point.lat);
            bounds.min_lon = bounds.min_lon.min(point.lon);
            bounds.max_lon = bounds.max_lon.max(point.lon);
        }
        Some(bounds)
    }

    /// Grow the box outward by `margin_deg` on every side.
    pub fn expand(&self, margin_deg: f64) -> Self {
        Self {
            min_lat: self.min_lat - margin_deg,
            max_lat: self.max_lat + margin_deg,
            min_lon: self.min_lon - margin_deg,
            max_lon: self.max_lon + margin_deg,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Coordinate> {
        vec![
            Coordinate::new(min, min),
            Coordinate::new(min, max),
            Coordinate::new(max, max),
            Coordinate::new(max, min),
            Coordinate::new(min, min),
        ]
    }

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(9.9, 76.2, 9.9, 76.2);
        assert!(dist < 0.001);
    }

    #[test]
    fn longitude_degree_shrinks_with_latitude() {
        let equator = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        let north = haversine_km(Coordinate::new(60.0, 0.0), Coordinate::new(60.0, 1.0));
        assert!((north - equator / 2.0).abs() < 0.5, "got {north} vs {equator}");
    }

    #[test]
    fn path_distance_sums_legs() {
        let path = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(2.0, 0.0),
        ];
        let direct = haversine_km(path[0], path[2]);
        assert!((path_distance_km(&path) - direct).abs() < 1e-6);
        assert_eq!(path_distance_km(&path[..1]), 0.0);
    }

    #[test]
    fn ring_contains_interior_only() {
        let ring = square(0.0, 2.0);
        assert!(point_in_ring(Coordinate::new(1.0, 1.0), &ring));
        assert!(!point_in_ring(Coordinate::new(3.0, 1.0), &ring));
        assert!(!point_in_ring(Coordinate::new(1.0, -0.5), &ring));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        let ring = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        assert!(!point_in_ring(Coordinate::new(0.5, 0.5), &ring));
    }

    #[test]
    fn bounding_box_expands_on_every_side() {
        let bounds = BoundingBox::around(&[Coordinate::new(9.9, 76.2), Coordinate::new(8.5, 76.9)])
            .expect("bounds")
            .expand(6.0);
        assert!((bounds.min_lat - 2.5).abs() < 1e-9);
        assert!((bounds.max_lat - 15.9).abs() < 1e-9);
        assert!((bounds.min_lon - 70.2).abs() < 1e-9);
        assert!((bounds.max_lon - 82.9).abs() < 1e-9);
        assert!(BoundingBox::around(&[]).is_none());
    }
}
