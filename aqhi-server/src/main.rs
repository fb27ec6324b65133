use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aqhi_server::aqhi::AqhiClient;
use aqhi_server::config::ServerConfig;
use aqhi_server::map::MapConfig;
use aqhi_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match AqhiClient::new(config.aqhi_config()) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create AQHI client: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(endpoint = client.endpoint(), "using AQHI feed");

    let mut state = AppState::new(client, MapConfig::default(), config.bind_addr);
    if let Some(url) = &config.public_url {
        state = state.with_public_url(url.as_str());
    }

    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {e}", config.bind_addr);
            return ExitCode::FAILURE;
        }
    };

    info!("AQHI map listening on http://{}", config.bind_addr);
    info!("  GET  /          - Station map and share QR code");
    info!("  GET  /api/map   - Map markers as JSON");
    info!("  GET  /health    - Health check");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
