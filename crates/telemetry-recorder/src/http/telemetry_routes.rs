use crate::http::{AppState, Owner};

use axum::{Json, extract::State};
use telemetry_recorder_core::SensorReading;

/// `GET /api/telemetria`: live buffer snapshot, oldest first.
pub(crate) async fn live_readings(
    State(state): State<AppState>,
    _owner: Owner,
) -> Json<Vec<SensorReading>> {
    Json(state.buffer.snapshot())
}
