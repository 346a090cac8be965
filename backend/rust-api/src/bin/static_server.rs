use mathocr_api::{config::Config, create_static_router, shutdown_signal, telemetry, StaticSite};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let provider = telemetry::init_tracing("mathocr-static")?;

    let config = Config::load()?;
    let site = StaticSite::new(config.static_dir.clone());
    tracing::info!("Serving static files from {}", site.root.display());

    let app = create_static_router(site);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Static server listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown(provider);
    Ok(())
}
