use std::sync::Arc;

use mathocr_api::{config::Config, create_router, services::AppState, shutdown_signal, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let provider = telemetry::init_tracing("mathocr-api")?;

    tracing::info!("Starting math-ocr API");

    let config = Config::load()?;
    tracing::info!(
        deepseek_configured = config.deepseek_target().is_some(),
        "Configuration loaded for environment: {}",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );
    if config.deepseek_target().is_none() {
        tracing::warn!("DEEPSEEK_API_KEY or DEEPSEEK_ENDPOINT missing, /parse will use the fallback parser");
    }

    let port = config.port;
    let app_state = Arc::new(AppState::new(config)?);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("math-ocr backend listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown(provider);
    Ok(())
}
