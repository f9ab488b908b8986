//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::Result;

/// Full application router: `/api` routes plus middleware layers
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("Starting jejurag API server...");

    let state = AppState {
        rag: Arc::new(RagService::new(config)?),
    };
    let app = build_router(state, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health   - Health check");
    info!("  POST /api/init     - Build the place index");
    info!("  POST /api/search   - Semantic place search");
    info!("  POST /api/chat     - Travel answer with live weather");
    info!("  GET  /api/weather  - Current weather (?lat=&lon=)");

    axum::serve(listener, app).await?;

    Ok(())
}
