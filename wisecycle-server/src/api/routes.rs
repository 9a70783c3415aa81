//! REST API routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use geojson::Feature;
use serde::{Deserialize, Serialize};
use tracing::error;
use wisecycle_core::{Coordinate, RouteOutcome, RoutingError, network_layer};

use crate::state::AppState;

/// Create the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/route", get(find_route))
        .route("/network", get(network))
        .route("/stats", get(stats))
        .with_state(state)
}

/// `source` and `dest` are `lat,lon` pairs or addresses
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub dest: String,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub status: &'static str,
    pub description: String,
    /// Distinguishes failure causes that share a status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// `[lat, lon]` pairs from source to destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Coordinate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Feature>,
}

impl RouteResponse {
    fn failure(status: &'static str, description: String, diagnostic: Option<String>) -> Self {
        Self {
            status,
            description,
            diagnostic,
            path: None,
            cost: None,
            geojson: None,
        }
    }

    fn internal() -> Self {
        Self::failure(
            "internal_error",
            "We could not process your request. Please try again.".to_string(),
            None,
        )
    }

    /// HTTP status and body for a planner answer
    fn from_outcome(outcome: RouteOutcome) -> (StatusCode, Self) {
        match outcome {
            RouteOutcome::Found { path, description } => {
                let geojson = path
                    .to_geojson()
                    .inspect_err(|e| error!("Failed to encode route as GeoJSON: {e}"))
                    .ok();
                let response = RouteResponse {
                    status: "found",
                    description,
                    diagnostic: None,
                    cost: Some(path.cost()),
                    path: Some(path.into_coordinates()),
                    geojson,
                };
                (StatusCode::OK, response)
            }
            RouteOutcome::NoRoute {
                reason,
                description,
            } => {
                let diagnostic = match reason {
                    RoutingError::NodeNotFound { .. } => "node_not_found",
                    RoutingError::Unreachable { .. } => "unreachable",
                };
                (
                    StatusCode::NOT_FOUND,
                    RouteResponse::failure("no_route", description, Some(diagnostic.to_string())),
                )
            }
            RouteOutcome::InvalidInput {
                reason,
                description,
                ..
            } => (
                StatusCode::BAD_REQUEST,
                RouteResponse::failure("invalid_input", description, Some(reason.to_string())),
            ),
            RouteOutcome::Internal { description } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RouteResponse::failure("internal_error", description, None),
            ),
        }
    }
}

async fn find_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> (StatusCode, Json<RouteResponse>) {
    let task_query = format!("{} -> {}", query.source, query.dest);
    // Attachment takes the graph write lock, keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || {
        state
            .planner
            .find_route_text(&query.source, &query.dest, Some(&state.geocoder))
    })
    .await;

    let (status, response) = match outcome {
        Ok(outcome) => RouteResponse::from_outcome(outcome),
        Err(e) => {
            error!("Route task for {task_query} failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, RouteResponse::internal())
        }
    };
    (status, Json(response))
}

#[derive(Debug, Deserialize)]
pub struct NetworkQuery {
    /// Route category, e.g. `On-Road Bike Lane`
    pub name: Option<String>,
}

async fn network(State(state): State<Arc<AppState>>, Query(query): Query<NetworkQuery>) -> Response {
    match network_layer(&state.records, query.name.as_deref()) {
        Ok(layer) => Json(layer).into_response(),
        Err(e) => {
            error!("Failed to build network layer: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(RouteResponse::internal())).into_response()
        }
    }
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.planner.stats())
}
