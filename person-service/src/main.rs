use person_service::config::PersonConfig;
use person_service::services::init_metrics;
use person_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Metrics recorder must exist before any metric is recorded
    init_metrics().map_err(|e| std::io::Error::other(e.to_string()))?;

    let config = PersonConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "person-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        backend = ?config.storage.backend,
        timeout_secs = config.request_timeout_secs,
        "Starting person-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
