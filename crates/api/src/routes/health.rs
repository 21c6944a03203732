//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::app::AppState;
use crate::config::StorageBackend;
use crate::error::ApiError;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageHealth,
}

/// Storage backend health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageHealth {
    pub backend: &'static str,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

fn backend_name(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    }
}

async fn ping(pool: &PgPool) -> Result<(), ApiError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Probes the storage backend. The in-memory backend is always reachable.
async fn probe(state: &AppState) -> StorageHealth {
    let backend = backend_name(state.config.storage.backend);
    let Some(pool) = &state.pool else {
        return StorageHealth {
            backend,
            connected: true,
            latency_ms: Some(0),
        };
    };

    persistence::metrics::record_pool_metrics(pool);

    let start = std::time::Instant::now();
    match ping(pool).await {
        Ok(()) => StorageHealth {
            backend,
            connected: true,
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            StorageHealth {
                backend,
                connected: false,
                latency_ms: None,
            }
        }
    }
}

/// Full health check endpoint.
///
/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let storage = probe(&state).await;

    if !storage.connected {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    }))
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK once storage accepts queries.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    if let Some(pool) = &state.pool {
        ping(pool)
            .await
            .map_err(|_| ApiError::ServiceUnavailable("Database is not reachable".into()))?;
    }

    Ok(Json(StatusResponse {
        status: "ready".to_string(),
    }))
}
