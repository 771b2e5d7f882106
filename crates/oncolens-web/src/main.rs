//! OncoLens Web Server
//!
//! Run with: cargo run -p oncolens-web

use oncolens_common::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("oncolens=debug,info")),
        )
        .init();

    info!("Starting OncoLens Web Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!(backend = %config.backend.base_url, "Configuration loaded");

    let state = oncolens_web::state::AppState::from_config(config.clone())?;

    match state.api.health().await {
        Ok(h) if h.is_ok() => info!("Prediction backend is up"),
        Ok(h) => warn!(status = %h.status, "Prediction backend reported a non-ok status"),
        Err(e) => warn!(
            "Prediction backend at {} is not reachable yet: {}",
            config.backend.base_url,
            e.user_message()
        ),
    }

    let app = oncolens_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("🚀 Server listening on http://{}", config.server.bind);
    info!("   Dashboard: http://{}/dashboard", config.server.bind);
    info!("   Predict:   http://{}/predict", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
