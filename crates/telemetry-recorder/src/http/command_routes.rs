use crate::http::{ApiError, AppState, Owner};

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct CommandRequest {
    acao: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommandResponse {
    status: &'static str,
    acao: &'static str,
}

/// `POST /api/comando`: validate and publish an actuator command.
pub(crate) async fn send_command(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let action = state.dispatcher.send(&request.acao)?;

    info!(owner = %owner, action = %action, "Command sent");

    Ok(Json(CommandResponse {
        status: "Comando enviado",
        acao: action.as_str(),
    }))
}
