//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;
use nav_core::{Hazard, HazardRequest, RouteError, RouteSummary};

type ApiError = (StatusCode, Json<Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new().route("/route", get(get_route)).route(
        "/hazards",
        get(list_hazards).post(add_hazard).delete(clear_hazards),
    )
}

// === Request/Response types ===

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// `lon,lat` pair or a place name
    pub start: Option<String>,
    pub end: Option<String>,
    /// `true` (any case) asks for a simplified path
    pub straight: Option<String>,
}

impl RouteQuery {
    fn wants_straight(&self) -> bool {
        self.straight
            .as_deref()
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Location text exactly as requested
    pub start: String,
    pub end: String,
    /// `[lat, lon]` pairs in travel order
    pub path: Vec<[f64; 2]>,
    pub waypoints: usize,
    pub distance_km: f64,
    pub hazards_active: usize,
    pub attempts: usize,
}

fn error_response(err: RouteError) -> ApiError {
    let status = match &err {
        RouteError::Validation(_)
        | RouteError::UnresolvableLocation { .. }
        | RouteError::NoCoordinates => StatusCode::BAD_REQUEST,
        RouteError::Unroutable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// === Route Handlers ===

async fn get_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
    let straight = query.wants_straight();
    let (Some(start_text), Some(end_text)) = (non_empty(query.start), non_empty(query.end)) else {
        return Err(error_response(RouteError::NoCoordinates));
    };

    let start = state
        .resolve_location(&start_text)
        .await
        .map_err(error_response)?;
    let end = state
        .resolve_location(&end_text)
        .await
        .map_err(error_response)?;

    let planner = state.planner().clone();
    let result = tokio::task::spawn_blocking(move || planner.route(start, end, straight))
        .await
        .map_err(|err| {
            tracing::error!("Route search task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "route search failed" })),
            )
        })?
        .map_err(|err| {
            tracing::info!(start = %start_text, end = %end_text, "Route rejected: {}", err);
            error_response(err)
        })?;

    let summary = RouteSummary::from_result(&result);
    tracing::info!(
        start = %start_text,
        end = %end_text,
        waypoints = summary.waypoint_count,
        distance_km = summary.distance_km,
        attempts = summary.attempts,
        "Route planned"
    );

    Ok(Json(RouteResponse {
        start: start_text,
        end: end_text,
        path: summary.path,
        waypoints: summary.waypoint_count,
        distance_km: summary.distance_km,
        hazards_active: summary.hazards_active,
        attempts: summary.attempts,
    }))
}

// === Hazard Handlers ===

async fn add_hazard(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HazardRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": rejection.body_text() })),
        )
    })?;

    let hazard = request
        .into_hazard()
        .map_err(|err| error_response(err.into()))?;
    let category = hazard.category.clone();
    let count = state.hazards().add(hazard);
    tracing::info!(category = %category, count, "Hazard added");

    Ok(Json(json!({ "status": "added", "count": count })))
}

async fn list_hazards(State(state): State<Arc<AppState>>) -> Json<Vec<Hazard>> {
    Json(state.hazards().list())
}

async fn clear_hazards(State(state): State<Arc<AppState>>) -> Json<Value> {
    let removed = state.hazards().len();
    state.hazards().clear();
    tracing::info!(removed, "Hazards cleared");
    Json(json!({ "status": "cleared" }))
}
