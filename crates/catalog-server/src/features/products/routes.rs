//! Product API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/products/fetch` - Ingest a price feed
//! - `GET /api/v1/products` - List products

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{commands::FetchProductsCommand, queries::ListProductsQuery};
use crate::{api::response::ApiResponse, error::AppError, features::FeatureState};

/// Creates the products router
pub fn products_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_products))
        .route("/fetch", post(fetch_products))
}

/// Ingest a price feed
///
/// # Endpoint
///
/// `POST /api/v1/products/fetch`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/prices.csv" }
/// ```
///
/// # Response
///
/// - `200 OK` - Ingestion summary
/// - `400 Bad Request` - Invalid or missing URL
/// - `500 Internal Server Error` - Feed or storage failure
/// - `504 Gateway Timeout` - Deadline exceeded
async fn fetch_products(
    State(state): State<FeatureState>,
    payload: Result<Json<FetchProductsCommand>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(command) = payload.map_err(|e| AppError::InvalidArgument(e.body_text()))?;

    let response = super::commands::fetch::handle(state, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// List products
///
/// # Endpoint
///
/// `GET /api/v1/products?sort_by=name&sort_ascending=true&page_number=1&page_size=20`
///
/// # Response
///
/// - `200 OK` - One page of products, possibly empty
/// - `400 Bad Request` - Missing or out-of-range page, unknown sort field
/// - `500 Internal Server Error` - Storage failure
/// - `504 Gateway Timeout` - Deadline exceeded
async fn list_products(
    State(state): State<FeatureState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::InvalidArgument(e.body_text()))?;

    let products = super::queries::list::handle(state, query).await?;

    Ok(ApiResponse::success(products).into_response())
}
