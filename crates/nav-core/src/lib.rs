//! Maritime route planning over open water.
//!
//! Given two coordinates, builds a lattice of navigable sea points that avoids
//! land and registered hazard zones, finds the shortest geodesic path across
//! it, and optionally reduces the path to its significant turns.

pub mod classifier;
pub mod error;
pub mod graph;
pub mod hazards;
pub mod land;
pub mod locator;
pub mod models;
pub mod resolve;
pub mod router;
pub mod search;
pub mod simplify;
pub mod spatial;

pub use classifier::Classifier;
pub use error::{LandError, Result, RouteError, SearchError, ValidationError};
pub use graph::{build_graph, GridParams, RouteGraph};
pub use hazards::HazardRegistry;
pub use land::{LandMask, LandPolygon};
pub use locator::nearest_node;
pub use models::{Coordinate, Hazard, HazardRequest, HazardShape, RouteResult, RouteSummary};
pub use resolve::{parse_location, LocationResolver, NumericResolver, ParsedLocation};
pub use router::{RoutePlanner, RouterConfig};
pub use search::shortest_path;
pub use simplify::simplify_path;
pub use spatial::haversine_distance;
