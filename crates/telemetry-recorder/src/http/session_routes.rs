//! Recording control and session history routes.

use crate::http::{ApiError, AppState, Owner, run_blocking};

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use telemetry_recorder_core::{SensorReading, Session, SessionId};
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartRequest {
    #[serde(default)]
    nome: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionIdResponse {
    session_id: SessionId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    recording: bool,
    session_id: Option<SessionId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionSummary {
    id: SessionId,
    nome: String,
    data_inicio: DateTime<Utc>,
    data_fim: Option<DateTime<Utc>>,
}

impl From<Session> for SessionSummary {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            nome: session.name,
            data_inicio: session.started_at,
            data_fim: session.ended_at,
        }
    }
}

/// Name used when the client sends none.
pub(crate) fn default_session_name(now: DateTime<Utc>) -> String {
    format!("Sessão {}", now.format("%d/%m/%Y %H:%M:%S"))
}

/// `POST /api/sessions/start`
#[instrument(skip_all, fields(owner = %owner))]
pub(crate) async fn start_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
    body: Option<Json<StartRequest>>,
) -> Result<Json<SessionIdResponse>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let name = match request.nome.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_session_name(Utc::now()),
    };

    let recorder = state.recorder.clone();
    let session_id = run_blocking(move || recorder.start(&name, &owner)).await?;

    Ok(Json(SessionIdResponse { session_id }))
}

/// `POST /api/sessions/stop`
#[instrument(skip_all, fields(owner = %owner))]
pub(crate) async fn stop_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<SessionIdResponse>, ApiError> {
    let recorder = state.recorder.clone();
    let session_id = run_blocking(move || recorder.stop()).await?;

    info!(session_id = %session_id, stopped_by = %owner, "Session stopped over HTTP");

    Ok(Json(SessionIdResponse { session_id }))
}

/// `GET /api/sessions/status`
pub(crate) async fn recording_status(
    State(state): State<AppState>,
    _owner: Owner,
) -> Json<StatusResponse> {
    let session_id = state.recorder.current_session_id();
    Json(StatusResponse {
        recording: session_id.is_some(),
        session_id,
    })
}

/// `GET /api/sessions`: the requester's sessions, newest first.
pub(crate) async fn list_sessions(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<Vec<SessionSummary>>, ApiError> {
    let query = state.query.clone();
    let sessions = run_blocking(move || query.sessions(&owner)).await?;
    Ok(Json(sessions.into_iter().map(SessionSummary::from).collect()))
}

/// `GET /api/sessions/{id}/dados`
///
/// Unparseable ids get the same 404 as unknown or foreign ones.
#[instrument(skip_all, fields(owner = %owner, session_id = %id))]
pub(crate) async fn session_readings(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    let session_id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found())?;
    let query = state.query.clone();
    let readings = run_blocking(move || query.readings(session_id, &owner)).await?;
    Ok(Json(readings))
}
