//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::JejuRagError;
use crate::index::ScoredDocument;
use crate::rag::PlaceWithWeather;
use crate::weather::WeatherSnapshot;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error reply: status plus an `ApiResponse` body carrying the message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<JejuRagError> for ApiError {
    fn from(err: JejuRagError) -> Self {
        let status = if err.is_invalid_input() {
            StatusCode::BAD_REQUEST
        } else if err.is_service_unavailable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub index_built: bool,
}

/// Index build response
#[derive(Debug, Serialize, Deserialize)]
pub struct InitResponse {
    pub documents: usize,
}

/// Place search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

/// One search hit
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Absent when the similarity is undefined
    pub score: Option<f32>,
}

impl From<ScoredDocument> for SearchHit {
    fn from(hit: ScoredDocument) -> Self {
        let metadata = hit.document.metadata;
        Self {
            id: metadata.id,
            name: metadata.name,
            address: metadata.address,
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            score: (!hit.score.is_nan()).then_some(hit.score),
        }
    }
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub places: Vec<PlaceWithWeather>,
}

/// Weather query parameters; both or neither
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Weather response
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub weather: WeatherSnapshot,
    pub recommendation: String,
}
