use crate::http::AppState;

use axum::{Json, extract::State};
use serde::Serialize;
use telemetry_recorder_core::WriterStatsSnapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthResponse {
    status: &'static str,
    buffer_len: usize,
    recording: bool,
    writer: WriterStatsSnapshot,
}

/// `GET /api/health`: liveness plus durable-path counters.
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        buffer_len: state.buffer.len(),
        recording: state.recorder.current_session_id().is_some(),
        writer: state.writer_stats.snapshot(),
    })
}
