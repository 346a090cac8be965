use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use std::sync::Arc;

use crate::{
    error::ApiError,
    metrics::WRONG_ANSWERS_SAVED_TOTAL,
    models::{record_from_body, SaveWrongResponse},
    services::AppState,
};

/// POST /save_wrong
pub async fn save_wrong(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SaveWrongResponse>, ApiError> {
    let record = record_from_body(&body, is_json(&headers)).map_err(|e| {
        ApiError::BadRequest(format!("Failed to parse JSON request body: {}", e))
    })?;

    match state.wrong_book.save(record).await {
        Ok(count) => {
            WRONG_ANSWERS_SAVED_TOTAL.with_label_values(&["success"]).inc();
            Ok(Json(SaveWrongResponse::saved(count)))
        }
        Err(e) => {
            WRONG_ANSWERS_SAVED_TOTAL.with_label_values(&["error"]).inc();
            Err(e.into())
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json") || ct.contains("+json"))
}
