use crate::http::{ApiError, AppState};

use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated owner id supplied by the identity layer.
///
/// Read from the configured header; absent or blank values are rejected
/// with 401 before any handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl FromRequestParts<AppState> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&state.owner_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(value.to_string()))
            .ok_or_else(ApiError::unauthorized)
    }
}
