//! Snapping arbitrary coordinates onto graph nodes.

use crate::error::SearchError;
use crate::graph::RouteGraph;
use crate::models::Coordinate;
use crate::spatial::haversine_km;

/// Index of the node closest to `point` by great-circle distance.
///
/// Linear scan over the per-request lattice. Ties go to the node enumerated
/// first, so results are reproducible.
pub fn nearest_node(point: Coordinate, graph: &RouteGraph) -> Result<usize, SearchError> {
    let mut best: Option<(usize, f64)> = None;
    for (id, node) in graph.nodes().iter().enumerate() {
        let distance = haversine_km(point, *node);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((id, distance)),
        }
    }
    best.map(|(id, _)| id).ok_or(SearchError::EmptyGraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, GridParams};

    #[test]
    fn empty_graph_is_an_error() {
        let graph = RouteGraph::default();
        assert_eq!(
            nearest_node(Coordinate::new(0.0, 0.0), &graph),
            Err(SearchError::EmptyGraph)
        );
    }

    #[test]
    fn snaps_to_closest_lattice_point() {
        let origin = Coordinate::new(0.0, 0.0);
        let graph = build_graph(origin, origin, GridParams::new(0.5, 1.0), |_| true);
        let id = nearest_node(Coordinate::new(0.2, 0.4), &graph).unwrap();
        assert_eq!(graph.node(id), Some(Coordinate::new(0.0, 0.5)));
    }

    #[test]
    fn skips_blocked_points() {
        let origin = Coordinate::new(0.0, 0.0);
        let graph = build_graph(origin, origin, GridParams::new(0.5, 1.0), |p| {
            !(p.lat == 0.0 && p.lon == 0.0)
        });
        let id = nearest_node(Coordinate::new(0.01, 0.0), &graph).unwrap();
        assert_eq!(graph.node(id), Some(Coordinate::new(0.5, 0.0)));
    }

    #[test]
    fn ties_resolve_to_first_enumerated_node() {
        let origin = Coordinate::new(0.0, 0.0);
        let graph = build_graph(origin, origin, GridParams::new(0.5, 1.0), |_| true);
        // Equidistant from (0.0, 0.0) and (0.0, 0.5); the western node comes first.
        let id = nearest_node(Coordinate::new(0.0, 0.25), &graph).unwrap();
        assert_eq!(graph.node(id), Some(Coordinate::new(0.0, 0.0)));
    }
}
