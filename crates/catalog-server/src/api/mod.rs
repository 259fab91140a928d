//! HTTP surface of the catalog server

pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::{config::CorsConfig, features, middleware};

/// Build the application router with all routes and middleware
pub fn create_router(state: features::FeatureState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone())
        .nest("/api/v1", features::router(state))
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// Health check handler
async fn health_check(State(state): State<features::FeatureState>) -> Response {
    let backend = state.store.backend();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "storage": backend.as_str(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(%backend, "Storage health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "storage": backend.as_str(),
                })),
            )
                .into_response()
        },
    }
}
