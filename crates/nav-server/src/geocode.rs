//! Place-name lookup against an OpenCage-compatible geocoding endpoint.

use std::time::Duration;

use nav_core::Coordinate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoder returned HTTP {0}")]
    Status(StatusCode),

    #[error("no geocoding match for '{0}'")]
    NotFound(String),
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    lat: f64,
    lng: f64,
}

/// HTTP geocoder with a bounded result cache.
#[derive(Debug)]
pub struct Geocoder {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
    cache: TtlCache<String, Coordinate>,
}

impl Geocoder {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        cache: TtlCache<String, Coordinate>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            timeout,
            cache,
        }
    }

    /// Geocoder built from server config, or `None` when no API key is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.geocoder_key.clone()?;
        Some(Self::new(
            Client::new(),
            config.geocoder_url.clone(),
            api_key,
            config.geocode_timeout(),
            TtlCache::new(config.geocode_cache_ttl(), config.geocode_cache_max_entries),
        ))
    }

    /// Resolve a place name to its first valid match.
    pub async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let key = query.trim().to_lowercase();
        if let Some(coordinate) = self.cache.get(&key) {
            tracing::debug!(query, "Geocode cache hit");
            return Ok(coordinate);
        }

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let payload: GeocodeResponse = response.json().await?;
        let coordinate =
            first_match(payload).ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

        tracing::debug!(query, lat = coordinate.lat, lon = coordinate.lon, "Geocoded location");
        self.cache.insert(key, coordinate);
        Ok(coordinate)
    }
}

fn first_match(payload: GeocodeResponse) -> Option<Coordinate> {
    payload
        .results
        .into_iter()
        .map(|result| Coordinate::new(result.geometry.lat, result.geometry.lng))
        .find(|coordinate| coordinate.validate().is_ok())
}
