//! Adaptive route search.
//!
//! Builds a water lattice around the endpoints, snaps both onto it and runs
//! Dijkstra. When no path exists the box grows and the lattice gets finer,
//! up to a bounded number of attempts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::error::{Result, RouteError, SearchError};
use crate::graph::{build_graph, estimate_lattice_points, GridParams, RouteGraph};
use crate::hazards::HazardRegistry;
use crate::land::LandMask;
use crate::locator::nearest_node;
use crate::models::{Coordinate, RouteResult};
use crate::search::shortest_path;
use crate::simplify::{simplify_path, DEFAULT_TOLERANCE_KM};
use crate::spatial::path_distance_km;

/// Tuning for the refinement loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub initial_step_deg: f64,
    pub initial_buffer_deg: f64,
    /// Added to the buffer after each failed attempt
    pub buffer_growth_deg: f64,
    /// Floor for the halved lattice step
    pub min_step_deg: f64,
    /// Graph builds allowed before giving up
    pub max_attempts: usize,
    /// Largest lattice a single attempt may classify
    pub max_grid_points: usize,
    pub simplify_tolerance_km: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            initial_step_deg: 0.2,
            initial_buffer_deg: 6.0,
            buffer_growth_deg: 2.0,
            min_step_deg: 0.05,
            max_attempts: 6,
            max_grid_points: 2_000_000,
            simplify_tolerance_km: DEFAULT_TOLERANCE_KM,
        }
    }
}

impl RouterConfig {
    fn initial_params(&self) -> GridParams {
        GridParams::new(self.initial_step_deg, self.initial_buffer_deg)
    }

    fn relax(&self, params: GridParams) -> GridParams {
        GridParams::new(
            (params.step_deg / 2.0).max(self.min_step_deg),
            params.buffer_deg + self.buffer_growth_deg,
        )
    }
}

/// Route planner over a shared land mask and hazard registry.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    land: Arc<LandMask>,
    hazards: Arc<HazardRegistry>,
    config: RouterConfig,
}

impl RoutePlanner {
    pub fn new(land: Arc<LandMask>, hazards: Arc<HazardRegistry>) -> Self {
        Self::with_config(land, hazards, RouterConfig::default())
    }

    pub fn with_config(
        land: Arc<LandMask>,
        hazards: Arc<HazardRegistry>,
        config: RouterConfig,
    ) -> Self {
        Self {
            land,
            hazards,
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn land(&self) -> &LandMask {
        &self.land
    }

    pub fn hazards(&self) -> &HazardRegistry {
        &self.hazards
    }

    /// Plan a route between two optional endpoints.
    ///
    /// Missing endpoints fail with [`RouteError::NoCoordinates`]; running out
    /// of refinement attempts fails with [`RouteError::Unroutable`].
    pub fn find_route(
        &self,
        start: Option<Coordinate>,
        end: Option<Coordinate>,
        straight: bool,
    ) -> Result<RouteResult> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(RouteError::NoCoordinates);
        };
        self.route(start, end, straight)
    }

    /// Plan a route between two resolved coordinates.
    pub fn route(&self, start: Coordinate, end: Coordinate, straight: bool) -> Result<RouteResult> {
        start.validate()?;
        end.validate()?;

        // Every attempt of this request classifies against the same hazards.
        let hazards = self.hazards.list();
        let classifier = Classifier::new(&self.land, &hazards);

        let max_attempts = self.config.max_attempts.max(1);
        let mut params = self.config.initial_params();
        let mut attempts = 0usize;

        while attempts < max_attempts {
            let lattice_points = estimate_lattice_points(start, end, params);
            if lattice_points > self.config.max_grid_points {
                tracing::warn!(
                    lattice_points,
                    max_grid_points = self.config.max_grid_points,
                    "Route grid too large, stopping refinement"
                );
                break;
            }

            attempts += 1;
            let graph = build_graph(start, end, params, |point| classifier.is_navigable(point));
            tracing::debug!(
                attempt = attempts,
                step_deg = params.step_deg,
                buffer_deg = params.buffer_deg,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "Built route graph"
            );

            match search(&graph, start, end) {
                Ok(node_ids) => {
                    let route = self.finish(&graph, &node_ids, straight, attempts, params);
                    return Ok(RouteResult {
                        hazards_active: hazards.len(),
                        ..route
                    });
                }
                Err(err) => {
                    tracing::debug!(attempt = attempts, "Route attempt failed: {}", err);
                    params = self.config.relax(params);
                }
            }
        }

        tracing::warn!(attempts, "Route refinement exhausted without a path");
        Err(RouteError::Unroutable { attempts })
    }

    fn finish(
        &self,
        graph: &RouteGraph,
        node_ids: &[usize],
        straight: bool,
        attempts: usize,
        params: GridParams,
    ) -> RouteResult {
        let raw: Vec<Coordinate> = node_ids.iter().filter_map(|id| graph.node(*id)).collect();
        let node_count = raw.len();
        let path = if straight {
            simplify_path(&raw, self.config.simplify_tolerance_km)
        } else {
            raw
        };
        let distance_km = path_distance_km(&path);

        RouteResult {
            path,
            distance_km,
            node_count,
            attempts,
            step_deg: params.step_deg,
            buffer_deg: params.buffer_deg,
            hazards_active: 0,
        }
    }
}

fn search(
    graph: &RouteGraph,
    start: Coordinate,
    end: Coordinate,
) -> std::result::Result<Vec<usize>, SearchError> {
    let source = nearest_node(start, graph)?;
    let target = nearest_node(end, graph)?;
    shortest_path(graph, source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::LandPolygon;
    use crate::models::Hazard;

    fn planner(land: LandMask, config: RouterConfig) -> RoutePlanner {
        RoutePlanner::with_config(Arc::new(land), Arc::new(HazardRegistry::new()), config)
    }

    fn quick_config() -> RouterConfig {
        RouterConfig {
            initial_step_deg: 0.5,
            initial_buffer_deg: 1.0,
            buffer_growth_deg: 1.0,
            min_step_deg: 0.25,
            max_attempts: 3,
            ..RouterConfig::default()
        }
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let planner = planner(LandMask::empty(), quick_config());
        assert!(matches!(
            planner.find_route(None, Some(Coordinate::new(0.0, 0.0)), false),
            Err(RouteError::NoCoordinates)
        ));
        assert!(matches!(
            planner.find_route(Some(Coordinate::new(0.0, 0.0)), None, false),
            Err(RouteError::NoCoordinates)
        ));
    }

    #[test]
    fn invalid_coordinate_is_a_validation_error() {
        let planner = planner(LandMask::empty(), quick_config());
        assert!(matches!(
            planner.route(Coordinate::new(91.0, 0.0), Coordinate::new(0.0, 0.0), false),
            Err(RouteError::Validation(_))
        ));
    }

    #[test]
    fn open_water_route_succeeds_first_attempt() {
        let planner = planner(LandMask::empty(), quick_config());
        let result = planner
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), false)
            .unwrap();
        assert_eq!(result.attempts, 1);
        assert_eq!(result.path.first(), Some(&Coordinate::new(0.0, 0.0)));
        assert_eq!(result.path.last(), Some(&Coordinate::new(0.0, 1.0)));
        assert_eq!(result.node_count, 3);
        assert!((result.distance_km - 111.19).abs() < 0.1);
    }

    #[test]
    fn all_hazard_region_exhausts_attempts() {
        let hazards = Arc::new(HazardRegistry::new());
        hazards.add(Hazard::circle("storm", Coordinate::new(0.0, 0.0), 5_000.0));
        let planner = RoutePlanner::with_config(Arc::new(LandMask::empty()), hazards, quick_config());
        assert!(matches!(
            planner.route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0), false),
            Err(RouteError::Unroutable { attempts: 3 })
        ));
    }

    #[test]
    fn hazard_count_matches_planning_snapshot() {
        let hazards = Arc::new(HazardRegistry::new());
        hazards.add(Hazard::circle("piracy", Coordinate::new(30.0, 30.0), 10.0));
        let planner = RoutePlanner::with_config(
            Arc::new(LandMask::empty()),
            hazards.clone(),
            quick_config(),
        );

        let result = planner
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), false)
            .unwrap();
        assert_eq!(result.hazards_active, 1);

        // Later registry changes do not rewrite a finished route.
        hazards.clear();
        assert_eq!(result.hazards_active, 1);
        let result = planner
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), false)
            .unwrap();
        assert_eq!(result.hazards_active, 0);
    }

    #[test]
    fn oversized_grid_stops_refinement() {
        let config = RouterConfig {
            max_grid_points: 10,
            ..quick_config()
        };
        let planner = planner(LandMask::empty(), config);
        assert!(matches!(
            planner.route(Coordinate::new(0.0, 0.0), Coordinate::new(5.0, 5.0), false),
            Err(RouteError::Unroutable { attempts: 0 })
        ));
    }

    #[test]
    fn relax_halves_step_down_to_floor() {
        let config = quick_config();
        let first = config.relax(config.initial_params());
        assert_eq!(first, GridParams::new(0.25, 2.0));
        let second = config.relax(first);
        assert_eq!(second, GridParams::new(0.25, 3.0));
    }

    #[test]
    fn straight_flag_simplifies_path() {
        let wall = LandPolygon::new(
            vec![
                Coordinate::new(-0.6, 0.4),
                Coordinate::new(-0.6, 0.6),
                Coordinate::new(0.6, 0.6),
                Coordinate::new(0.6, 0.4),
            ],
            Vec::new(),
        )
        .unwrap();
        let config = RouterConfig {
            initial_step_deg: 0.02,
            ..quick_config()
        };
        let planner = planner(LandMask::from_polygons(vec![wall]), config);
        let raw = planner
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), false)
            .unwrap();
        let straight = planner
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), true)
            .unwrap();
        assert_eq!(straight.node_count, raw.node_count);
        assert!(straight.path.len() < raw.path.len());
        assert_eq!(straight.path.first(), raw.path.first());
        assert_eq!(straight.path.last(), raw.path.last());
    }
}
