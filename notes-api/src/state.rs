//! Application state for the notes service.

use std::sync::Arc;

use inference::TextCompletion;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use storage::{NoteStore, ProductStore, TaskStore};

use crate::error::ApiResult;
use crate::orchestrator::NoteOrchestrator;

const DEFAULT_DATABASE_URL: &str = "sqlite://notes.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the HTTP server and its database pool.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite connection URL.
    pub database_url: String,
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Maximum database pool connections.
    pub max_connections: u32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS
        }
    }
}

impl ServerConfig {
    /// Reads `DATABASE_URL`, `HOST`, `PORT` and `MAX_CONNECTIONS`, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS)
        }
    }

    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for `ServerConfig`.
#[derive(Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    max_connections: Option<u32>
}

impl ServerConfigBuilder {
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            database_url: self
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
        }
    }
}

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool, used directly by the health check.
    pub pool: SqlitePool,
    pub notes: NoteStore,
    pub tasks: TaskStore,
    pub products: ProductStore,
    pub orchestrator: NoteOrchestrator,
    /// Prometheus handle, present once a recorder has been installed.
    pub metrics: Option<PrometheusHandle>,
    pub config: Arc<ServerConfig>
}

impl AppState {
    /// Opens the database described by `config` and wires every store.
    pub async fn new(config: ServerConfig, completion: Arc<dyn TextCompletion>) -> ApiResult<Self> {
        let pool = storage::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::with_pool(pool, completion, config))
    }

    /// Creates application state from an existing pool (useful for testing).
    #[must_use]
    pub fn with_pool(
        pool: SqlitePool,
        completion: Arc<dyn TextCompletion>,
        config: ServerConfig
    ) -> Self {
        let notes = NoteStore::new(pool.clone());
        Self {
            tasks: TaskStore::new(pool.clone()),
            products: ProductStore::new(pool.clone()),
            orchestrator: NoteOrchestrator::new(notes.clone(), completion),
            notes,
            pool,
            metrics: None,
            config: Arc::new(config)
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
