//! Immutable land boundary loaded once at startup.
//!
//! Land is read from GeoJSON (Polygon / MultiPolygon, `[lon, lat]` order) and
//! kept as plain rings with bounding boxes so containment checks can reject
//! most polygons without ray casting.

use std::path::Path;

use serde_json::Value;

use crate::error::LandError;
use crate::models::Coordinate;
use crate::spatial::{point_in_ring, BoundingBox};

/// One land polygon: an exterior ring minus optional holes (lakes, lagoons).
#[derive(Debug, Clone)]
pub struct LandPolygon {
    exterior: Vec<Coordinate>,
    holes: Vec<Vec<Coordinate>>,
    bounds: BoundingBox,
}

impl LandPolygon {
    pub fn new(exterior: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Result<Self, LandError> {
        if exterior.len() < 3 {
            return Err(LandError::InvalidGeometry(
                "polygon ring must have at least 3 vertices".to_string(),
            ));
        }
        let bounds = BoundingBox::around(&exterior)
            .ok_or_else(|| LandError::InvalidGeometry("empty polygon ring".to_string()))?;
        Ok(Self {
            exterior,
            holes,
            bounds,
        })
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }
        point_in_ring(point, &self.exterior)
            && !self.holes.iter().any(|hole| point_in_ring(point, hole))
    }
}

/// Union of all land polygons.
#[derive(Debug, Clone, Default)]
pub struct LandMask {
    polygons: Vec<LandPolygon>,
}

impl LandMask {
    /// A mask with no land at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_polygons(polygons: Vec<LandPolygon>) -> Self {
        Self { polygons }
    }

    pub fn from_geojson_file(path: impl AsRef<Path>) -> Result<Self, LandError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson_str(&content)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self, LandError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_geojson_value(&value)
    }

    /// Accepts a FeatureCollection, a Feature, or a bare geometry.
    pub fn from_geojson_value(value: &Value) -> Result<Self, LandError> {
        let mut polygons = Vec::new();
        match value.get("type").and_then(|v| v.as_str()) {
            Some("FeatureCollection") => {
                let features = value
                    .get("features")
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| {
                        LandError::InvalidGeometry("FeatureCollection without features".to_string())
                    })?;
                for feature in features {
                    if let Some(geometry) = feature.get("geometry") {
                        collect_polygons(geometry, &mut polygons)?;
                    }
                }
            }
            Some("Feature") => {
                if let Some(geometry) = value.get("geometry") {
                    collect_polygons(geometry, &mut polygons)?;
                }
            }
            Some(_) => collect_polygons(value, &mut polygons)?,
            None => {
                return Err(LandError::InvalidGeometry(
                    "GeoJSON object has no type".to_string(),
                ))
            }
        }
        Ok(Self { polygons })
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_land(&self, point: Coordinate) -> bool {
        self.polygons.iter().any(|polygon| polygon.contains(point))
    }
}

fn collect_polygons(geometry: &Value, out: &mut Vec<LandPolygon>) -> Result<(), LandError> {
    let geom_type = geometry.get("type").and_then(|v| v.as_str()).unwrap_or("");
    let coords = geometry.get("coordinates");

    match geom_type {
        "Polygon" => {
            let rings = coords.ok_or_else(|| missing_coordinates(geom_type))?;
            out.push(parse_polygon(rings)?);
        }
        "MultiPolygon" => {
            let parts = coords
                .and_then(|v| v.as_array())
                .ok_or_else(|| missing_coordinates(geom_type))?;
            for part in parts {
                out.push(parse_polygon(part)?);
            }
        }
        "GeometryCollection" => {
            if let Some(members) = geometry.get("geometries").and_then(|v| v.as_array()) {
                for member in members {
                    collect_polygons(member, out)?;
                }
            }
        }
        other => tracing::debug!("Skipping non-polygon land geometry '{}'", other),
    }
    Ok(())
}

fn parse_polygon(rings: &Value) -> Result<LandPolygon, LandError> {
    let rings = rings
        .as_array()
        .ok_or_else(|| LandError::InvalidGeometry("polygon rings must be an array".to_string()))?;
    let mut parsed = rings.iter().map(parse_ring);
    let exterior = parsed
        .next()
        .ok_or_else(|| LandError::InvalidGeometry("polygon has no exterior ring".to_string()))??;
    let holes = parsed.collect::<Result<Vec<_>, _>>()?;
    LandPolygon::new(exterior, holes)
}

fn parse_ring(ring: &Value) -> Result<Vec<Coordinate>, LandError> {
    let positions = ring
        .as_array()
        .ok_or_else(|| LandError::InvalidGeometry("ring must be an array".to_string()))?;
    positions
        .iter()
        .map(|position| {
            parse_lon_lat(position).ok_or_else(|| {
                LandError::InvalidGeometry(format!("invalid position {}", position))
            })
        })
        .collect()
}

fn parse_lon_lat(value: &Value) -> Option<Coordinate> {
    let arr = value.as_array()?;
    let lon = arr.first()?.as_f64()?;
    let lat = arr.get(1)?.as_f64()?;
    Some(Coordinate::new(lat, lon))
}

fn missing_coordinates(geom_type: &str) -> LandError {
    LandError::InvalidGeometry(format!("{} geometry without coordinates", geom_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_polygon_feature_collection() {
        let geojson = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]]
                }
            }]
        });
        let mask = LandMask::from_geojson_value(&geojson).expect("valid land");
        assert_eq!(mask.polygon_count(), 1);
        assert!(mask.is_land(Coordinate::new(2.0, 1.0)));
        assert!(!mask.is_land(Coordinate::new(5.0, 1.0)));
    }

    #[test]
    fn holes_are_water() {
        let geojson = json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                [[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]]
            ]
        });
        let mask = LandMask::from_geojson_value(&geojson).unwrap();
        assert!(mask.is_land(Coordinate::new(2.0, 2.0)));
        assert!(!mask.is_land(Coordinate::new(5.0, 5.0)));
    }

    #[test]
    fn multipolygon_parts_are_all_land() {
        let geojson = json!({
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                    [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]]
                ]
            }
        });
        let mask = LandMask::from_geojson_value(&geojson).unwrap();
        assert_eq!(mask.polygon_count(), 2);
        assert!(mask.is_land(Coordinate::new(0.5, 0.5)));
        assert!(mask.is_land(Coordinate::new(5.5, 5.5)));
        assert!(!mask.is_land(Coordinate::new(3.0, 3.0)));
    }

    #[test]
    fn non_polygon_geometries_are_skipped() {
        let geojson = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        let mask = LandMask::from_geojson_value(&geojson).unwrap();
        assert_eq!(mask.polygon_count(), 0);
    }

    #[test]
    fn malformed_position_is_an_error() {
        let geojson = json!({"type": "Polygon", "coordinates": [[[0.0], [1.0, 0.0], [1.0, 1.0]]]});
        assert!(matches!(
            LandMask::from_geojson_value(&geojson),
            Err(LandError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            LandMask::from_geojson_str("{not json"),
            Err(LandError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LandMask::from_geojson_file("/nonexistent/land.geojson").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/land.geojson"));
    }

    #[test]
    fn empty_mask_is_all_water() {
        assert!(!LandMask::empty().is_land(Coordinate::new(0.0, 0.0)));
    }
}
