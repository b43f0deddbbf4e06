//! AmazeWorth price service entry point

use amazeworth_price_core::{ModelArtifacts, Predictor};
use amazeworth_price_service::{http, ConfigManager, PredictionService, SERVICE_NAME};
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config_manager = ConfigManager::new().context("Failed to load configuration")?;
    let config = config_manager.get_config().clone();

    init_logging(&config.log_level);

    info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("Running in {:?} environment", config_manager.get_environment());

    let artifacts = ModelArtifacts::load_from_dir(&config.model_dir, &config.artifact_files);
    let predictor = Arc::new(Predictor::new(artifacts));
    let service = Arc::new(PredictionService::new(predictor, &config));

    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);

    let (bound, server) = warp::serve(http::routes(service))
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{}", bound);
    server.await;

    info!("{} stopped gracefully", SERVICE_NAME);
    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` wins over the configured level.
fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
