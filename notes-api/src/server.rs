//! Server setup and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use inference::{InferenceConfig, OpenAiClient, credential::api_key_from_env};
use tokio::net::TcpListener;
use tokio::signal;

use crate::error::{ApiError, ApiResult};
use crate::routes::create_router;
use crate::state::{AppState, ServerConfig};
use crate::telemetry;

pub struct NotesServer {
    state: Arc<AppState>
}

impl NotesServer {
    #[must_use]
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> ApiResult<()> {
        let addr: SocketAddr = format!("{}:{}", self.state.config.host, self.state.config.port)
            .parse()
            .map_err(|e| ApiError::Configuration(format!("Invalid address: {e}")))?;

        let router = create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, "Notes server starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {e}")))?;

        tracing::info!("Notes server stopped");
        Ok(())
    }
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
            Ok(mut stream) => {
                stream.recv().await;
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
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

/// Entry point for running the server from environment variables.
///
/// Initializes tracing (honouring `RUST_LOG`), installs the Prometheus
/// recorder and connects the OpenAI-compatible client.
pub async fn run_from_env() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    let config = ServerConfig::from_env();
    let inference_config = InferenceConfig::from_env();
    tracing::info!(
        model = %inference_config.model,
        base_url = %inference_config.base_url,
        "Inference provider configured"
    );
    let client = OpenAiClient::new(inference_config, api_key_from_env());

    let handle = telemetry::install_recorder()?;
    let state = AppState::new(config, Arc::new(client))
        .await?
        .with_metrics(handle);

    NotesServer::with_state(Arc::new(state)).run().await
}
