//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pdfbook_core::PdfbookError;
use serde_json::json;
use thiserror::Error;

/// Error returned by a handler, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request itself is unusable (bad multipart body, missing field)
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Conversion(#[from] PdfbookError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conversion(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::error!(error = %self, status = status.as_u16(), "Request error");

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
