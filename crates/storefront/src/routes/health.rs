//! Health check endpoints.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::db;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies that the CMS answers, and the session database when one is
/// configured. Returns 503 Service Unavailable otherwise.
#[instrument(skip(state))]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if let Err(e) = state.cms().ping().await {
        tracing::warn!("CMS not ready: {e}");
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    if let Some(pool) = state.pool()
        && let Err(e) = db::ping(pool).await
    {
        tracing::warn!("Session database not ready: {e}");
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    StatusCode::OK
}
