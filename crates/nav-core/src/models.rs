//! Core data models for the route planner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::spatial::{haversine_km, point_in_ring};

/// Category label used when a hazard payload omits `type`.
pub const DEFAULT_HAZARD_CATEGORY: &str = "unspecified";

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate from a `[lon, lat]` pair, the order used on the wire.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(ValidationError::new("coordinates must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError::new(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ValidationError::new(format!(
                "longitude {} is outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

// ========== HAZARD MODELS ==========

/// An exclusion zone that routes must avoid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// Free-text label for display (storm, piracy, exercise area, ...)
    #[serde(rename = "type")]
    pub category: String,
    #[serde(flatten)]
    pub shape: HazardShape,
    pub created_at: DateTime<Utc>,
}

/// Geometry of a hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum HazardShape {
    /// Everything within `radius_km` of `center`
    Circle { center: Coordinate, radius_km: f64 },
    /// Closed ring implied between the last and first vertex
    Polygon { vertices: Vec<Coordinate> },
}

impl Hazard {
    pub fn new(category: impl Into<String>, shape: HazardShape) -> Self {
        Self {
            category: category.into(),
            shape,
            created_at: Utc::now(),
        }
    }

    pub fn circle(category: impl Into<String>, center: Coordinate, radius_km: f64) -> Self {
        Self::new(category, HazardShape::Circle { center, radius_km })
    }

    pub fn polygon(category: impl Into<String>, vertices: Vec<Coordinate>) -> Self {
        Self::new(category, HazardShape::Polygon { vertices })
    }

    /// Check if a point falls inside this hazard.
    /// Circles use great-circle distance and include their boundary.
    pub fn contains(&self, point: Coordinate) -> bool {
        match &self.shape {
            HazardShape::Circle { center, radius_km } => {
                haversine_km(point, *center) <= *radius_km
            }
            HazardShape::Polygon { vertices } => point_in_ring(point, vertices),
        }
    }
}

/// Hazard payload as received at the boundary.
///
/// Coordinates arrive as `[lon, lat]` pairs. Nothing here is trusted until
/// [`HazardRequest::into_hazard`] has validated it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,
    #[serde(default, rename = "type")]
    pub category: Option<String>,
}

impl HazardRequest {
    pub fn circle(category: &str, center: Coordinate, radius_km: f64) -> Self {
        Self {
            mode: Some("circle".to_string()),
            center: Some([center.lon, center.lat]),
            radius_km: Some(radius_km),
            polygon: None,
            category: Some(category.to_string()),
        }
    }

    pub fn polygon(category: &str, vertices: &[Coordinate]) -> Self {
        Self {
            mode: Some("polygon".to_string()),
            center: None,
            radius_km: None,
            polygon: Some(vertices.iter().map(|c| [c.lon, c.lat]).collect()),
            category: Some(category.to_string()),
        }
    }

    /// Validate the payload and turn it into a hazard.
    pub fn into_hazard(self) -> Result<Hazard, ValidationError> {
        let category = self
            .category
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HAZARD_CATEGORY.to_string());

        let mode = self
            .mode
            .ok_or_else(|| ValidationError::new("hazard mode is required"))?;

        let shape = match mode.trim().to_ascii_lowercase().as_str() {
            "circle" => {
                let center = self
                    .center
                    .map(Coordinate::from_lon_lat)
                    .ok_or_else(|| ValidationError::new("circle hazard requires a center"))?;
                center.validate()?;
                let radius_km = self
                    .radius_km
                    .ok_or_else(|| ValidationError::new("circle hazard requires radius_km"))?;
                if !radius_km.is_finite() || radius_km < 0.0 {
                    return Err(ValidationError::new(
                        "radius_km must be a non-negative number",
                    ));
                }
                HazardShape::Circle { center, radius_km }
            }
            "polygon" => {
                let raw = self
                    .polygon
                    .ok_or_else(|| ValidationError::new("polygon hazard requires vertices"))?;
                if raw.len() < 3 {
                    return Err(ValidationError::new(
                        "polygon hazard must have at least 3 vertices",
                    ));
                }
                let vertices: Vec<Coordinate> =
                    raw.into_iter().map(Coordinate::from_lon_lat).collect();
                for vertex in &vertices {
                    vertex.validate()?;
                }
                HazardShape::Polygon { vertices }
            }
            other => {
                return Err(ValidationError::new(format!(
                    "unknown hazard mode '{}'; expected circle or polygon",
                    other
                )))
            }
        };

        Ok(Hazard::new(category, shape))
    }
}

// ========== ROUTE MODELS ==========

/// A computed route between two snapped water nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Coordinates from the start snap to the end snap
    pub path: Vec<Coordinate>,
    /// Sum of great-circle legs along `path`
    pub distance_km: f64,
    /// Nodes on the raw lattice path, before any simplification
    pub node_count: usize,
    /// Graph builds performed, including the successful one
    pub attempts: usize,
    pub step_deg: f64,
    pub buffer_deg: f64,
    /// Hazards in the snapshot this route was planned against
    pub hazards_active: usize,
}

/// Route summary handed to downstream consumers (rendering, API responses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// `[lat, lon]` pairs in travel order
    pub path: Vec<[f64; 2]>,
    pub waypoint_count: usize,
    pub distance_km: f64,
    pub hazards_active: usize,
    pub attempts: usize,
}

impl RouteSummary {
    pub fn from_result(result: &RouteResult) -> Self {
        Self {
            path: result.path.iter().map(|c| [c.lat, c.lon]).collect(),
            waypoint_count: result.path.len(),
            distance_km: (result.distance_km * 100.0).round() / 100.0,
            hazards_active: result.hazards_active,
            attempts: result.attempts,
        }
    }
}
