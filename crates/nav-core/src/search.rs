//! Weighted shortest path over a route graph.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::SearchError;
use crate::graph::RouteGraph;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    cost: FloatOrd,
    node: usize,
}

/// Dijkstra from `source` to `target`, returning node ids along the path.
///
/// Edge weights are non-negative geodesic distances. Equal-cost frontier
/// entries pop in node-id order, so the same graph always yields the same path.
pub fn shortest_path(
    graph: &RouteGraph,
    source: usize,
    target: usize,
) -> Result<Vec<usize>, SearchError> {
    let count = graph.node_count();
    if count == 0 {
        return Err(SearchError::EmptyGraph);
    }
    if source >= count || target >= count {
        return Err(SearchError::NoPath);
    }
    if source == target {
        return Ok(vec![source]);
    }

    let mut distances = vec![f64::INFINITY; count];
    let mut parents: Vec<Option<usize>> = vec![None; count];
    let mut open_set = BinaryHeap::new();

    distances[source] = 0.0;
    open_set.push(Reverse(OpenNode {
        cost: FloatOrd(0.0),
        node: source,
    }));

    while let Some(Reverse(current)) = open_set.pop() {
        if current.cost.0 > distances[current.node] {
            continue;
        }
        if current.node == target {
            return Ok(reconstruct_path(&parents, source, target));
        }

        for edge in graph.neighbours(current.node) {
            let tentative = current.cost.0 + edge.distance_km;
            if tentative < distances[edge.target] {
                distances[edge.target] = tentative;
                parents[edge.target] = Some(current.node);
                open_set.push(Reverse(OpenNode {
                    cost: FloatOrd(tentative),
                    node: edge.target,
                }));
            }
        }
    }

    Err(SearchError::NoPath)
}

fn reconstruct_path(parents: &[Option<usize>], source: usize, target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match parents[current] {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
