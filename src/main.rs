use finview::{
    backend::BackendClient,
    config::Config,
    provider::CoinGeckoClient,
    server::{self, AppState},
    ScanOrchestrator,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finview=info")))
        .init();

    info!("==================================================");
    info!("  FINVIEW - alt-data scan dashboard");
    info!("==================================================");

    let config = Config::from_env()?;
    info!("Backend URL: {}", config.backend_url);
    info!("Price API URL: {}", config.price_api_url);
    info!("Chart time offset: {}", config.chart_offset);

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let orchestrator = ScanOrchestrator::new(
        Arc::new(BackendClient::new(http.clone(), &config.backend_url)),
        Arc::new(CoinGeckoClient::new(http, &config.price_api_url)),
        config.chart_offset,
    );
    let app = server::router(Arc::new(AppState::new(orchestrator)));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on port {} (WebSocket at /ws)", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
