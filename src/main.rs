// src/main.rs
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use tor_network_status::{
    config,
    metrics::{spawn_metrics_server, MetricsRegistry},
    onionoo::OnionooClient,
    server::{RequestHandler, ServerBuilder},
    status::StatusService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tor_network_status=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path)?;

    // Initialize metrics
    let metrics_registry = Arc::new(MetricsRegistry::new()?);
    let metrics = metrics_registry.collector();

    if config.metrics.enabled {
        let metrics_addr = SocketAddr::new(config.server.listen.ip(), config.metrics.port);
        spawn_metrics_server(metrics_addr, metrics_registry.clone(), config.metrics.path.clone())?;
    }

    let client = OnionooClient::new(&config.upstream).context("Failed to build Onionoo client")?;
    info!(
        "Relay details from {} (timeout {:?})",
        client.url(),
        config.upstream.timeout()
    );

    let status = Arc::new(StatusService::new(
        Arc::new(client),
        config.upstream.source.clone(),
        Some(metrics.clone()),
    ));

    let handler = RequestHandler::new(status, config.server.route.as_str()).with_metrics(metrics);

    info!(
        "Serving tor network status on {}{}",
        config.server.listen, config.server.route
    );

    ServerBuilder::new(config.server.listen)
        .with_handler(handler)
        .serve()
        .await?;

    Ok(())
}
