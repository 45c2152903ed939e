use std::net::SocketAddr;
use zyncro::bootstrap;
use zyncro::config::Config;
use zyncro::infrastructure::http::build_router;
use zyncro::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _observability = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    let state = bootstrap::build_default_app_state(&config).await?;

    let app = build_router(state);

    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
