//! Greedy polyline reduction that keeps only significant turns.

use crate::models::Coordinate;
use crate::spatial::haversine_km;

/// Default two-leg length below which an interior point is dropped.
pub const DEFAULT_TOLERANCE_KM: f64 = 10.0;

/// Drop interior points whose two adjacent raw legs sum to less than
/// `tolerance_km`.
///
/// Single pass, not Douglas-Peucker. Each interior point is measured against
/// its immediate neighbours in the input, never against the last point kept,
/// so long runs of short legs can be thinned unevenly. Endpoints always
/// survive and paths of two points or fewer come back unchanged.
pub fn simplify_path(path: &[Coordinate], tolerance_km: f64) -> Vec<Coordinate> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut simplified = Vec::with_capacity(path.len());
    simplified.push(path[0]);
    for window in path.windows(3) {
        let (prev, curr, next) = (window[0], window[1], window[2]);
        let legs = haversine_km(prev, curr) + haversine_km(curr, next);
        if legs < tolerance_km {
            continue;
        }
        simplified.push(curr);
    }
    simplified.push(path[path.len() - 1]);
    simplified
}
