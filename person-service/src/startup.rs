use crate::config::{PersonConfig, StorageBackend};
use crate::handlers;
use crate::services::{bounded, InMemoryPersonStore, MongoPersonStore, PersonStore};
use axum::{middleware::from_fn, routing::get, Router};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared, read-only handler context. The store handle is created once at
/// startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub config: PersonConfig,
    pub store: Arc<dyn PersonStore>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: PersonConfig, store: Arc<dyn PersonStore>) -> Self {
        let request_timeout = config.request_timeout();
        Self {
            config,
            store,
            request_timeout,
        }
    }

    /// Issues one storage call bounded by the configured request timeout.
    pub async fn with_store<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn PersonStore>) -> Fut,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        bounded(operation, self.request_timeout, call(self.store.clone())).await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/ready",
            get(handlers::readiness_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/metrics",
            get(handlers::metrics_endpoint).fallback(handlers::method_not_allowed),
        )
        .route(
            "/person",
            get(handlers::list_people)
                .post(handlers::create_person)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/person/:id",
            get(handlers::get_person)
                .patch(handlers::update_person)
                .delete(handlers::delete_person)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span already sees the request id.
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn build_store(config: &PersonConfig) -> Result<Arc<dyn PersonStore>, AppError> {
    match config.storage.backend {
        StorageBackend::MongoDb => {
            let store = MongoPersonStore::connect(
                config.mongodb.uri.expose_secret(),
                &config.mongodb.database,
                &config.mongodb.collection,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory person store; data is lost on restart");
            Ok(Arc::new(InMemoryPersonStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: PersonConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Builds the application around an already constructed store.
    pub async fn build_with_store(
        config: PersonConfig,
        store: Arc<dyn PersonStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config.clone(), store);
        let router = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
