use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response}
};

use crate::schemas::HealthResponse;
use crate::state::AppState;

/// Health check endpoint.
///
/// Returns 200 if the server can reach the database, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.pool).await {
        tracing::warn!(error = %e, "Database health check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "disconnected"
            })
        );
    }

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            database: "connected"
        })
    )
}

/// Prometheus text exposition of every recorded metric.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render()
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed"
        )
            .into_response()
    }
}
