//! HTTP surface for the dashboard.
//!
//! Every `/api` route except health requires the identity layer's owner
//! header; see [`Owner`].

mod api_error;
mod app_state;
mod command_routes;
mod export_routes;
mod health_routes;
mod owner;
mod session_routes;
mod telemetry_routes;

pub(crate) use {api_error::ApiError, app_state::AppState, owner::Owner};

use axum::{
    Router,
    routing::{get, post},
};
use telemetry_recorder_core::CoreResult;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

/// Build the API router over `state`.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/telemetria", get(telemetry_routes::live_readings))
        .route("/api/comando", post(command_routes::send_command))
        .route("/api/exportar", get(export_routes::export_window))
        .route("/api/sessions", get(session_routes::list_sessions))
        .route("/api/sessions/status", get(session_routes::recording_status))
        .route("/api/sessions/start", post(session_routes::start_session))
        .route("/api/sessions/stop", post(session_routes::stop_session))
        .route("/api/sessions/{id}/dados", get(session_routes::session_readings))
        .route("/api/health", get(health_routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run a store-backed operation on the blocking pool.
///
/// SQLite calls are synchronous and share one connection with the durable
/// writer, so they stay off the async workers.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| {
            error!(error = %e, "Store task panicked");
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}
