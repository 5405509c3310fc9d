use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::external::price_provider::UpstreamError;

/// JSON body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Failures of the stock price endpoint.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Failures of the Google Trends endpoint.
///
/// These are reported in the body only; the status stays 200 so existing
/// clients that retry on any non-2xx do not hammer the upstream.
#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("No data found for Google Trends.")]
    EmptySeries,
    #[error("Google Trends request failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for TrendsError {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
