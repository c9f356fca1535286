//! Plan a single sea route from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nav_core::{
    HazardRegistry, HazardRequest, LandMask, LocationResolver, NumericResolver, RoutePlanner,
    RouteSummary, RouterConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GeoJSON file with land polygons
    #[arg(long)]
    land: PathBuf,

    /// Start position as "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    start: String,

    /// End position as "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    end: String,

    /// Reduce the path to its significant turns
    #[arg(long)]
    straight: bool,

    /// JSON file with an array of hazard payloads
    #[arg(long)]
    hazards: Option<PathBuf>,

    /// Graph builds allowed before giving up
    #[arg(long)]
    max_attempts: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nav_route=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let land = LandMask::from_geojson_file(&args.land)
        .with_context(|| format!("loading land boundary from {}", args.land.display()))?;
    tracing::info!(polygons = land.polygon_count(), "Loaded land boundary");

    let registry = Arc::new(HazardRegistry::new());
    if let Some(path) = &args.hazards {
        for request in load_hazards(path)? {
            registry.add(request.into_hazard()?);
        }
        tracing::info!(count = registry.len(), "Loaded hazards");
    }

    let mut config = RouterConfig::default();
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }

    let resolver = NumericResolver;
    let start = resolver.resolve(&args.start)?;
    let end = resolver.resolve(&args.end)?;

    let planner = RoutePlanner::with_config(Arc::new(land), registry.clone(), config);
    let result = planner.route(start, end, args.straight)?;
    let summary = RouteSummary::from_result(&result);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_hazards(path: &Path) -> Result<Vec<HazardRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading hazards from {}", path.display()))?;
    parse_hazards(&content).with_context(|| format!("parsing hazards from {}", path.display()))
}

fn parse_hazards(content: &str) -> Result<Vec<HazardRequest>> {
    Ok(serde_json::from_str(content)?)
}
