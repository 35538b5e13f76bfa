use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use cafe_api::{
    create_app,
    handlers::ApiState,
    init_observability,
    observability::Metrics,
    repositories::{create_pool, SqliteCafeRepository, TableManager},
    services::{ApiKey, CafeService},
    shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(&config.observability)?;

    info!("Starting cafe-api service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Database: {}", config.database.database_url);

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let pool = create_pool(&config.database).await?;
    TableManager::new(pool.clone()).create_cafe_table().await?;
    info!("Database ready");

    let repository = Arc::new(SqliteCafeRepository::new(pool.clone()).with_metrics(metrics.clone()));
    let cafe_service = Arc::new(
        CafeService::new(repository, ApiKey::new(&config.auth.api_key))
            .with_metrics(metrics.clone()),
    );
    info!("Services initialized successfully");

    let app = create_app(ApiState { cafe_service }, metrics, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
        shutdown_observability().await;
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}
