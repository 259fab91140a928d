//! Server-specific error types
//!
//! Every failure a client can see is classified as one of three kinds;
//! the detail behind an internal failure is logged, not returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    api::response::ErrorResponse,
    features::products::{FetchProductsError, ListProductsError},
};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::Internal(_) => "INTERNAL",
            AppError::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            AppError::InvalidArgument(message)
            | AppError::Internal(message)
            | AppError::DeadlineExceeded(message) => message,
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<FetchProductsError> for AppError {
    fn from(err: FetchProductsError) -> Self {
        match err {
            FetchProductsError::UrlValidation(e) => AppError::InvalidArgument(e.to_string()),
            FetchProductsError::Feed(e) => {
                tracing::error!("Feed error: {:?}", e);
                AppError::Internal(format!("failed to fetch product feed: {}", e))
            },
            e @ FetchProductsError::Store { .. } => {
                tracing::error!("Storage error: {:?}", e);
                AppError::Internal("failed to store products".to_string())
            },
            FetchProductsError::DeadlineExceeded(deadline) => {
                AppError::DeadlineExceeded(format!("ingest did not finish within {:?}", deadline))
            },
        }
    }
}

impl From<ListProductsError> for AppError {
    fn from(err: ListProductsError) -> Self {
        match err {
            e @ (ListProductsError::MissingPageNumber
            | ListProductsError::MissingPageSize
            | ListProductsError::Page(_)
            | ListProductsError::SortField(_)) => AppError::InvalidArgument(e.to_string()),
            ListProductsError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                AppError::Internal("failed to list products".to_string())
            },
            ListProductsError::DeadlineExceeded(deadline) => AppError::DeadlineExceeded(format!(
                "listing did not finish within {:?}",
                deadline
            )),
        }
    }
}
