//! Shared application state.

use std::sync::Arc;

use nav_core::{
    parse_location, Coordinate, HazardRegistry, LandMask, ParsedLocation, RouteError,
    RoutePlanner,
};

use crate::config::Config;
use crate::geocode::Geocoder;

/// State shared by all handlers: the planner, its hazard registry and the
/// optional geocoder.
#[derive(Debug)]
pub struct AppState {
    config: Config,
    hazards: Arc<HazardRegistry>,
    planner: RoutePlanner,
    geocoder: Option<Geocoder>,
}

impl AppState {
    pub fn new(config: Config, land: LandMask) -> Self {
        let hazards = Arc::new(HazardRegistry::new());
        let planner =
            RoutePlanner::with_config(Arc::new(land), hazards.clone(), config.router_config());
        let geocoder = Geocoder::from_config(&config);
        Self {
            config,
            hazards,
            planner,
            geocoder,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Option<Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hazards(&self) -> &HazardRegistry {
        &self.hazards
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    /// Turn a `start`/`end` parameter into a coordinate.
    ///
    /// Numeric `lon,lat` pairs never touch the network. Place names go to the
    /// geocoder when one is configured and are otherwise unresolvable.
    pub async fn resolve_location(&self, text: &str) -> Result<Coordinate, RouteError> {
        let query = match parse_location(text)? {
            ParsedLocation::Coordinate(coordinate) => return Ok(coordinate),
            ParsedLocation::Place(query) => query,
        };

        let Some(geocoder) = &self.geocoder else {
            return Err(RouteError::UnresolvableLocation { query });
        };

        match geocoder.geocode(&query).await {
            Ok(coordinate) => Ok(coordinate),
            Err(err) => {
                tracing::warn!(query = %query, "Geocoding failed: {}", err);
                Err(RouteError::UnresolvableLocation { query })
            }
        }
    }
}
