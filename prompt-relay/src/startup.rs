//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{generate, health_check, metrics};
use crate::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use crate::services::{metrics::init_metrics, GeminiTextProvider, ProviderError, TextProvider};
use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use secrecy::Secret;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Read-only after construction; the API key is injected here rather than
/// read from the environment per request.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Option<Secret<String>>,
    pub text_provider: Arc<dyn TextProvider>,
}

impl AppState {
    pub fn new(api_key: Option<Secret<String>>, text_provider: Arc<dyn TextProvider>) -> Self {
        Self {
            api_key,
            text_provider,
        }
    }

    /// Build state backed by the Gemini provider.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ProviderError> {
        let text_provider: Arc<dyn TextProvider> =
            Arc::new(GeminiTextProvider::new(config.upstream.clone())?);

        tracing::info!(
            model = %config.upstream.model,
            timeout_secs = config.upstream.timeout_secs,
            "Initialized Gemini text provider"
        );

        Ok(Self::new(config.api_key.clone(), text_provider))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", any(generate))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
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
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Port 0 binds a random port, which tests rely on.
    pub async fn build(config: RelayConfig) -> anyhow::Result<Self> {
        init_metrics();

        let state = AppState::from_config(&config)?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            e
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("prompt-relay listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
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
