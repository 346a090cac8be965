use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

/// Known routes keep their path; static assets and unknown paths are
/// collapsed so the label set stays bounded.
fn normalize_path(path: &str) -> String {
    const ROUTES: [&str; 8] = [
        "/",
        "/health",
        "/metrics",
        "/parse",
        "/save_wrong",
        "/api/solve",
        "/ocr.html",
        "/static",
    ];

    if path.starts_with("/static/") {
        return "/static/{asset}".to_string();
    }

    if ROUTES.contains(&path) {
        path.to_string()
    } else {
        "{other}".to_string()
    }
}
