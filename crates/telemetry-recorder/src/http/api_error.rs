use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use telemetry_recorder_core::CoreError;
use tracing::{error, warn};

/// Error response: a status code and a message for the dashboard.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    /// Request carried no authenticated owner.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Acesso negado! Faça login.",
        }
    }

    /// A background task failed before producing an answer.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Erro interno do servidor",
        }
    }

    /// Export called without both window bounds, or with unparseable ones.
    pub fn bad_window() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Precisa enviar inicio e fim",
        }
    }

    /// Uniform answer for missing and foreign sessions.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Sessão não encontrada",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let (status, message) = match &err {
            CoreError::AlreadyRecording { .. } => {
                (StatusCode::BAD_REQUEST, "Já existe uma sessão sendo gravada")
            }
            CoreError::NotRecording { .. } => {
                (StatusCode::BAD_REQUEST, "Nenhuma sessão está sendo gravada")
            }
            CoreError::InvalidCommand { .. } => (StatusCode::BAD_REQUEST, "Comando inválido"),
            CoreError::Decode { .. } => (StatusCode::BAD_REQUEST, "Dados inválidos"),
            CoreError::NotFound { .. } => return Self::not_found(),
            CoreError::Publish { .. } => (StatusCode::BAD_GATEWAY, "Falha ao enviar comando"),
            CoreError::Persistence { .. } | CoreError::InvalidConfig { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
            }
        };

        if status.is_server_error() {
            error!(status = %status, error = %err, "Request failed");
        } else {
            warn!(status = %status, error = %err, "Request rejected");
        }

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
