//! Lattice graph over the water inside a bounding region.
//!
//! The graph is rebuilt for every route attempt and never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;
use crate::spatial::{haversine_km, BoundingBox};

/// Node coordinates are rounded to 4 decimal places so neighbour lookups are
/// exact key comparisons.
pub const NODE_PRECISION: f64 = 10_000.0;

/// Lattice resolution and extent for one graph build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub step_deg: f64,
    pub buffer_deg: f64,
}

impl GridParams {
    pub fn new(step_deg: f64, buffer_deg: f64) -> Self {
        Self {
            step_deg,
            buffer_deg,
        }
    }

    fn is_usable(&self) -> bool {
        self.step_deg.is_finite()
            && self.step_deg > 0.0
            && self.buffer_deg.is_finite()
            && self.buffer_deg >= 0.0
    }
}

/// Exact lattice key in units of 1e-4 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    lat_e4: i64,
    lon_e4: i64,
}

impl NodeKey {
    pub fn from_coordinate(point: Coordinate) -> Self {
        Self {
            lat_e4: (point.lat * NODE_PRECISION).round() as i64,
            lon_e4: (point.lon * NODE_PRECISION).round() as i64,
        }
    }

    fn offset(&self, dlat_e4: i64, dlon_e4: i64) -> Self {
        Self {
            lat_e4: self.lat_e4 + dlat_e4,
            lon_e4: self.lon_e4 + dlon_e4,
        }
    }
}

/// Weighted link to a lattice neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: usize,
    pub distance_km: f64,
}

/// Navigable lattice nodes plus 4-connected geodesic edges.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: Vec<Coordinate>,
    index: HashMap<NodeKey, usize>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl RouteGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in enumeration order (latitude rows, then longitude).
    pub fn nodes(&self) -> &[Coordinate] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<Coordinate> {
        self.nodes.get(id).copied()
    }

    pub fn neighbours(&self, id: usize) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn index_of(&self, point: Coordinate) -> Option<usize> {
        self.index.get(&NodeKey::from_coordinate(point)).copied()
    }

    fn insert_node(&mut self, point: Coordinate) {
        let key = NodeKey::from_coordinate(point);
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, self.nodes.len());
        self.nodes.push(point);
        self.adjacency.push(Vec::new());
    }

    fn connect(&mut self, a: usize, b: usize) {
        let distance_km = haversine_km(self.nodes[a], self.nodes[b]);
        self.adjacency[a].push(Edge {
            target: b,
            distance_km,
        });
        self.adjacency[b].push(Edge {
            target: a,
            distance_km,
        });
        self.edge_count += 1;
    }
}

/// Round to the lattice key precision.
pub fn round_to_lattice(value: f64) -> f64 {
    (value * NODE_PRECISION).round() / NODE_PRECISION
}

/// Half-open float range `[start, stop)` with accumulated `step`, each value
/// rounded to lattice precision.
fn lattice_values(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut current = start;
    while current < stop {
        values.push(round_to_lattice(current));
        current += step;
    }
    values
}

fn region(start: Coordinate, end: Coordinate, buffer_deg: f64) -> BoundingBox {
    BoundingBox {
        min_lat: start.lat.min(end.lat),
        max_lat: start.lat.max(end.lat),
        min_lon: start.lon.min(end.lon),
        max_lon: start.lon.max(end.lon),
    }
    .expand(buffer_deg)
}

/// Upper bound on the lattice points a build with `params` would classify.
pub fn estimate_lattice_points(start: Coordinate, end: Coordinate, params: GridParams) -> usize {
    if !params.is_usable() {
        return 0;
    }
    let bounds = region(start, end, params.buffer_deg);
    let rows = ((bounds.max_lat - bounds.min_lat) / params.step_deg).ceil() + 1.0;
    let cols = ((bounds.max_lon - bounds.min_lon) / params.step_deg).ceil() + 1.0;
    let total = rows * cols;
    if total >= usize::MAX as f64 {
        usize::MAX
    } else {
        total as usize
    }
}

/// Build the water lattice around `start` and `end`.
///
/// Only points for which `is_navigable` holds become nodes. Nodes are linked
/// to their north/south/east/west neighbours at exactly one step; diagonal
/// gaps are never bridged. A region with no water yields an empty graph.
pub fn build_graph<F>(
    start: Coordinate,
    end: Coordinate,
    params: GridParams,
    is_navigable: F,
) -> RouteGraph
where
    F: Fn(Coordinate) -> bool,
{
    let mut graph = RouteGraph::default();
    if !params.is_usable() {
        return graph;
    }

    let bounds = region(start, end, params.buffer_deg);
    let lats = lattice_values(bounds.min_lat, bounds.max_lat, params.step_deg);
    let lons = lattice_values(bounds.min_lon, bounds.max_lon, params.step_deg);

    for &lat in &lats {
        for &lon in &lons {
            let point = Coordinate::new(lat, lon);
            if is_navigable(point) {
                graph.insert_node(point);
            }
        }
    }

    // Each undirected edge is discovered once, from its southern or western end.
    let step_e4 = (params.step_deg * NODE_PRECISION).round() as i64;
    for id in 0..graph.nodes.len() {
        let key = NodeKey::from_coordinate(graph.nodes[id]);
        for neighbour in [key.offset(step_e4, 0), key.offset(0, step_e4)] {
            if let Some(&other) = graph.index.get(&neighbour) {
                graph.connect(id, other);
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    #[test]
    fn open_water_grid_is_half_open() {
        let graph = build_graph(origin(), origin(), GridParams::new(0.5, 1.0), |_| true);
        // -1.0, -0.5, 0.0, 0.5 on each axis; 1.0 is the excluded stop bound.
        assert_eq!(graph.node_count(), 16);
        assert_eq!(graph.edge_count(), 24);
        assert!(graph.index_of(Coordinate::new(0.5, 0.5)).is_some());
        assert!(graph.index_of(Coordinate::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn all_land_region_is_empty() {
        let graph = build_graph(origin(), origin(), GridParams::new(0.5, 1.0), |_| false);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn edges_only_join_navigable_lattice_neighbours() {
        let blocked = |p: Coordinate| p.lon == 0.0 && p.lat >= 0.0;
        let graph = build_graph(origin(), origin(), GridParams::new(0.5, 1.0), |p| !blocked(p));
        assert_eq!(graph.node_count(), 14);

        for (id, point) in graph.nodes().iter().enumerate() {
            assert!(!blocked(*point));
            for edge in graph.neighbours(id) {
                let other = graph.node(edge.target).unwrap();
                assert!(!blocked(other));
                let dlat = (other.lat - point.lat).abs();
                let dlon = (other.lon - point.lon).abs();
                assert!(
                    (dlat < 1e-9 && (dlon - 0.5).abs() < 1e-9)
                        || (dlon < 1e-9 && (dlat - 0.5).abs() < 1e-9),
                    "non-lattice edge {:?} -> {:?}",
                    point,
                    other
                );
            }
        }
    }

    #[test]
    fn edge_weights_are_geodesic() {
        let graph = build_graph(
            Coordinate::new(60.0, 0.0),
            Coordinate::new(60.0, 0.0),
            GridParams::new(0.5, 0.5),
            |_| true,
        );
        let a = graph.index_of(Coordinate::new(60.0, 0.0)).unwrap();
        let west = graph.index_of(Coordinate::new(60.0, -0.5)).unwrap();
        let north = graph.index_of(Coordinate::new(59.5, 0.0)).unwrap();

        let weight_to = |target: usize| {
            graph
                .neighbours(a)
                .iter()
                .find(|edge| edge.target == target)
                .map(|edge| edge.distance_km)
                .unwrap()
        };
        // Half a degree of longitude at 60N is about half a degree of latitude.
        assert!((weight_to(west) - 27.8).abs() < 0.2, "{}", weight_to(west));
        assert!((weight_to(north) - 55.6).abs() < 0.2, "{}", weight_to(north));
    }

    #[test]
    fn lattice_keys_survive_float_accumulation() {
        let start = Coordinate::new(9.9, 76.2);
        let end = Coordinate::new(8.5, 76.9);
        let graph = build_graph(start, end, GridParams::new(0.2, 6.0), |_| true);
        assert!(graph.index_of(start).is_some());
        assert!(graph.index_of(Coordinate::new(8.5, 76.8)).is_some());
        // Interior nodes have all four neighbours.
        let id = graph.index_of(Coordinate::new(9.1, 76.4)).unwrap();
        assert_eq!(graph.neighbours(id).len(), 4);
    }

    #[test]
    fn unusable_params_build_nothing() {
        let graph = build_graph(origin(), origin(), GridParams::new(0.0, 1.0), |_| true);
        assert!(graph.is_empty());
        assert_eq!(estimate_lattice_points(origin(), origin(), GridParams::new(-1.0, 1.0)), 0);
    }

    #[test]
    fn estimate_bounds_actual_size() {
        let params = GridParams::new(0.2, 6.0);
        let start = Coordinate::new(9.9, 76.2);
        let end = Coordinate::new(8.5, 76.9);
        let actual = build_graph(start, end, params, |_| true).node_count();
        assert!(estimate_lattice_points(start, end, params) >= actual);
    }
}
