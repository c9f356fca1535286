//! Sea route server: plans routes around land and live hazard zones.

use anyhow::{Context, Result};
use nav_core::LandMask;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nav_server::api;
use nav_server::config::Config;
use nav_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nav_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting route server...");

    let config = Config::from_env();
    let land = load_land(&config)?;
    let port = config.server_port;
    if config.geocoder_key.is_none() {
        tracing::info!("No geocoder key configured; only 'lon,lat' locations will resolve");
    }

    let state = Arc::new(AppState::new(config, land));
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_land(config: &Config) -> Result<LandMask> {
    let Some(path) = config.land_path.as_deref() else {
        tracing::warn!("NAV_LAND_PATH not set; treating the whole map as water");
        return Ok(LandMask::empty());
    };
    let land = LandMask::from_geojson_file(path)
        .with_context(|| format!("loading land boundary from {}", path))?;
    tracing::info!(polygons = land.polygon_count(), "Loaded land boundary from {}", path);
    Ok(land)
}
