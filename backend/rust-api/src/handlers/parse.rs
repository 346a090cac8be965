use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::{
    models::{ParseRequest, ParseResponse},
    services::{parse_service::ParseService, AppState},
};

/// POST /parse
///
/// Always answers 200. The body is read leniently so that a missing or
/// malformed payload still gets a fallback classification.
pub async fn parse_problem(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ParseResponse> {
    let req = ParseRequest::from_body(&body);
    tracing::info!(
        text_len = req.text.as_deref().map_or(0, str::len),
        has_image = req.has_image(),
        "Parsing problem"
    );

    let service = ParseService::new(&state.config, state.http.clone());
    let response = service.handle_parse(req).await;

    tracing::info!("Parse finished, used={}", response.used.as_str());
    Json(response)
}
