//! Time-window export of the requester's recorded readings.

use crate::http::{ApiError, AppState, Owner, run_blocking};

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use telemetry_recorder_core::SensorReading;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub(crate) struct ExportParams {
    inicio: Option<String>,
    fim: Option<String>,
}

fn parse_bound(raw: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|value| value.with_timezone(&Utc))
        .ok_or_else(ApiError::bad_window)
}

/// `GET /api/exportar?inicio=<rfc3339>&fim=<rfc3339>`
///
/// Both bounds are required and inclusive.
#[instrument(skip_all, fields(owner = %owner))]
pub(crate) async fn export_window(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<ExportParams>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    let from = parse_bound(params.inicio.as_deref())?;
    let to = parse_bound(params.fim.as_deref())?;

    let query = state.query.clone();
    let readings = run_blocking(move || query.export(&owner, from, to)).await?;

    info!(from = %from, to = %to, reading_count = readings.len(), "Window exported");

    Ok(Json(readings))
}
