use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    models::SolveRequest,
    services::{solve_service::SolveService, AppState},
};

/// POST /api/solve
///
/// Failures come back as `{ "error": ... }` with status 200.
pub async fn solve(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SolveRequest>,
) -> Json<Value> {
    tracing::info!(level = %req.level, "Solving problem");

    let service = SolveService::new(&state.config, state.http.clone());
    match service.solve(&req).await {
        Ok(answer) => Json(answer),
        Err(e) => {
            tracing::warn!("Solve failed: {}", e);
            Json(json!({ "error": e.to_string() }))
        }
    }
}
