//! wschatd - WebSocket chat daemon.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wschatd::config::{Config, validation};
use wschatd::network::{EngineHandle, Gateway};
use wschatd::{Chat, http, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        admin_masks = config.admin.len(),
        "Starting wschatd"
    );

    metrics::init();
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    match config.server.metrics_port {
        Some(port) if port != 0 => {
            tokio::spawn(async move {
                http::run_http_server(port).await;
            });
            info!(port, "Prometheus HTTP server started");
        }
        _ => info!("Metrics endpoint disabled"),
    }

    let (engine, _engine_task) = EngineHandle::spawn(Chat::from_config(&config));

    let gateway = Gateway::bind(config.listen, engine).await?;
    gateway.run().await?;

    Ok(())
}
