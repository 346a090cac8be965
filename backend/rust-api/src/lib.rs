use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::Config;
pub use handlers::static_files::StaticSite;
pub use services::AppState;

/// Request bodies carry base64 images.
pub const BODY_LIMIT_BYTES: usize = 15 * 1024 * 1024;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any)
}

/// API server: parsing, wrong-answer book, solver proxy, liveness and metrics.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .route("/parse", post(handlers::parse::parse_problem))
        .route("/save_wrong", post(handlers::wrong_answers::save_wrong))
        .route("/api/solve", post(handlers::solve::solve))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(app_state)
        .layer(cors_layer())
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Static site server. Independent of the API server, nothing is shared.
pub fn create_static_router(site: StaticSite) -> Router {
    let assets = ServeDir::new(&site.root);

    Router::new()
        .route("/", get(handlers::static_files::index_page))
        .route("/ocr.html", get(handlers::static_files::ocr_page))
        .route("/health", get(handlers::health_check))
        .nest_service("/static", assets)
        .with_state(site)
        .layer(cors_layer())
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Resolves on Ctrl+C so servers can drain in-flight requests.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
