use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use newsmap_common::{GeoPoint, NewsMapError};

use crate::AppState;

#[derive(Deserialize)]
pub struct GuessRequest {
    lat: f64,
    lng: f64,
}

/// Map domain errors to HTTP statuses: not-found 404, bad input 400,
/// state-machine conflicts 409, headline/location shortages 503.
fn error_response(err: &NewsMapError) -> Response {
    let status = match err {
        NewsMapError::SessionNotFound | NewsMapError::LocationNotFound(_) => StatusCode::NOT_FOUND,
        NewsMapError::InvalidCoordinates { .. } => StatusCode::BAD_REQUEST,
        NewsMapError::RoundAlreadyResolved
        | NewsMapError::RoundNotResolved
        | NewsMapError::GameAlreadyComplete
        | NewsMapError::GameNotComplete => StatusCode::CONFLICT,
        NewsMapError::HeadlinesUnavailable | NewsMapError::InsufficientLocations { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        NewsMapError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err, "Request failed");
    }
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

pub async fn api_health() -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

pub async fn api_locations(State(state): State<Arc<AppState>>) -> Response {
    Json(state.directory.all()).into_response()
}

pub async fn api_news(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Response {
    let Some(location) = state.directory.lookup(&location_id) else {
        return error_response(&NewsMapError::LocationNotFound(location_id));
    };

    match state.headlines.get(location).await {
        Ok(headline) => Json(serde_json::json!({
            "location_id": location.location_id,
            "city": location.city,
            "country": location.country,
            "headline": headline,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn api_game_start(State(state): State<Arc<AppState>>) -> Response {
    match state.engine.create_session().await {
        Ok(start) => Json(start).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn api_game_guess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<GuessRequest>,
) -> Response {
    let guess = GeoPoint {
        lat: body.lat,
        lng: body.lng,
    };
    match state.engine.submit_guess(id, guess).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn api_game_next(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match state.engine.advance_round(id).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn api_game_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.engine.get_summary(id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(&e),
    }
}
