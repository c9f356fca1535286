//! Error types for route planning.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for route planning.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Failures surfaced to callers of the route planner.
///
/// Graph and search failures are recovered inside the refinement loop and
/// only show up here as [`RouteError::Unroutable`] once attempts run out.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed hazard or coordinate input, rejected before it reaches any state.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The coordinate resolver could not turn the text into a position.
    #[error("could not resolve location: {query}")]
    UnresolvableLocation { query: String },

    /// A route request arrived without a start or end coordinate.
    #[error("both a start and an end location are required")]
    NoCoordinates,

    /// Refinement was exhausted without finding a navigable path.
    #[error("no navigable sea route found after {attempts} attempts")]
    Unroutable { attempts: usize },
}

/// Input validation failure with a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Internal graph search failures. Recovered by relaxing grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("route graph has no navigable nodes")]
    EmptyGraph,

    #[error("no path between the snapped endpoints")]
    NoPath,
}

/// Failures while loading the land boundary.
#[derive(Debug, Error)]
pub enum LandError {
    #[error("failed to read land boundary from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid land geometry: {0}")]
    InvalidGeometry(String),
}
