//! API request handlers

use std::sync::Arc;

use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::*;
use crate::errors::JejuRagError;
use crate::rag::RagService;
use crate::weather::recommend;
use crate::weather::JEJU_CITY_HALL;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag: Arc<RagService>,
}

fn log_failure(route: &str, err: JejuRagError) -> ApiError {
    if err.is_invalid_input() {
        info!("{} rejected: {}", route, err);
    } else {
        error!("{} failed: {}", route, err);
    }
    ApiError::from(err)
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        index_built: state.rag.index().is_built().await,
    }))
}

/// Build the semantic index
pub async fn init_index(State(state): State<AppState>) -> ApiResult<InitResponse> {
    info!("POST /api/init");

    let documents = state
        .rag
        .build_index()
        .await
        .map_err(|e| log_failure("POST /api/init", e))?;
    Ok(Json(ApiResponse::success(InitResponse { documents })))
}

/// Semantic place search
pub async fn search_places(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Vec<SearchHit>> {
    info!("POST /api/search: {} (limit: {})", req.query, req.limit);

    let hits = state
        .rag
        .search(&req.query, req.limit)
        .await
        .map_err(|e| log_failure("POST /api/search", e))?;
    Ok(Json(ApiResponse::success(
        hits.into_iter().map(SearchHit::from).collect(),
    )))
}

/// Grounded travel answer
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    info!("POST /api/chat: {}", req.message);

    let response = state
        .rag
        .answer(&req.message)
        .await
        .map_err(|e| log_failure("POST /api/chat", e))?;
    Ok(Json(ApiResponse::success(ChatResponse {
        answer: response.answer,
        places: response.places,
    })))
}

/// Current weather at a point, Jeju City Hall by default
pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> ApiResult<WeatherResponse> {
    let service = state.rag.weather();
    let ((latitude, longitude), resolved) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => ((lat, lon), service.resolve_weather(lat, lon).await),
        (None, None) => (JEJU_CITY_HALL, service.default_region_weather().await),
        _ => {
            return Err(log_failure(
                "GET /api/weather",
                JejuRagError::InvalidQuery("lat and lon must be given together".to_string()),
            ))
        }
    };
    info!("GET /api/weather?lat={}&lon={}", latitude, longitude);

    let weather = resolved.map_err(|e| log_failure("GET /api/weather", e))?;
    let recommendation = recommend(&weather).to_string();

    Ok(Json(ApiResponse::success(WeatherResponse {
        latitude,
        longitude,
        weather,
        recommendation,
    })))
}
