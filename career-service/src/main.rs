use career_service::{
    build_router,
    config::CareerConfig,
    services::{metrics::init_metrics, GeminiProvider, MongoStore},
    AppState,
};
use service_core::error::AppError;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = CareerConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    init_metrics().map_err(|e| AppError::InternalError(anyhow::anyhow!("metrics registry: {}", e)))?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting career service"
    );

    // Initialize database connections
    tracing::info!("Initializing database connections");
    let store = MongoStore::connect(
        secrecy::ExposeSecret::expose_secret(&config.mongodb.uri),
        &config.mongodb.database,
    )
    .await?;
    store.initialize_indexes().await?;
    tracing::info!("Database initialized successfully");

    let provider = GeminiProvider::new(&config.gemini)
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("recommendation provider: {}", e)))?;
    tracing::info!(model = %config.gemini.model, "Recommendation provider initialized");

    let store = Arc::new(store);
    let state = AppState::new(config.clone(), store.clone(), store, Arc::new(provider));
    let app = build_router(state);

    let addr = config.common.socket_addr();

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
