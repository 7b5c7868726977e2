//! SentinelGov risk inference server

use std::net::SocketAddr;

use sentinel_risk::{build_scorer, create_router, init_tracing, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(Config::json_logs_from_env());

    // Load configuration
    let config = Config::from_env();

    tracing::info!("SentinelGov Risk Inference Engine starting ({})...", config.environment);
    if config.is_production() && config.redis_url.is_none() {
        tracing::warn!("REDIS_URL is not set");
    }

    let scorer = build_scorer(&config);
    tracing::info!("Active model: {}", scorer.active_model());

    let state = AppState::new(scorer, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
