//! Errors that reach the HTTP layer.
//!
//! `/parse` never produces one of these; its failures are folded into the
//! response body. Everything here renders as `{ "success": false, "error": .. }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::services::wrong_book::RecorderError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Recorder(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Recorder(e) => tracing::error!(error = %e, "save_wrong error"),
            ApiError::BadRequest(m) => tracing::warn!("{}", m),
        }

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}
