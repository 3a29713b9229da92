mod http;

use anyhow::Result;
use tracing::{error, info};

use streamsource_core::{
    bootstrap::{init_services, load_config},
    logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = load_config()?;

    // 2. Validate configuration (fail fast on misconfigurations)
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    // 3. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("StreamSource server starting...");
    info!("HTTP address: {}", config.http_address());

    // 4. Initialize services
    let services = init_services(&config)?;

    // 5. Serve HTTP until Ctrl+C
    let router = http::create_router(services.stream_service, &config.server);
    let listener = tokio::net::TcpListener::bind(config.http_address())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP address {}: {e}", config.http_address()))?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
