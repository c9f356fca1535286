//! Server configuration from environment.

use std::env;
use std::time::Duration;

use nav_core::RouterConfig;

pub const DEFAULT_GEOCODER_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// GeoJSON land boundary; `None` means every point is water
    pub land_path: Option<String>,
    pub max_attempts: usize,
    pub max_grid_points: usize,
    pub geocoder_url: String,
    /// Geocoding is disabled without a key
    pub geocoder_key: Option<String>,
    pub geocode_timeout_s: u64,
    pub geocode_cache_ttl_s: u64,
    pub geocode_cache_max_entries: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let router_defaults = RouterConfig::default();
        Self {
            server_port: env::var("NAV_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            land_path: non_empty_var("NAV_LAND_PATH"),
            max_attempts: env::var("NAV_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(router_defaults.max_attempts),
            max_grid_points: env::var("NAV_MAX_GRID_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(router_defaults.max_grid_points),
            geocoder_url: non_empty_var("NAV_GEOCODER_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            geocoder_key: non_empty_var("NAV_GEOCODER_KEY"),
            geocode_timeout_s: env::var("NAV_GEOCODE_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            geocode_cache_ttl_s: env::var("NAV_GEOCODE_CACHE_TTL_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            geocode_cache_max_entries: env::var("NAV_GEOCODE_CACHE_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// Route search tuning with the env overrides applied.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            max_attempts: self.max_attempts,
            max_grid_points: self.max_grid_points,
            ..RouterConfig::default()
        }
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_s.max(1))
    }

    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_cache_ttl_s)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
