//! Prometheus exposition endpoint

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{AppError, AppResult, AppState};

pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = state
        .metrics
        .render()
        .map_err(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            AppError::InternalError(e.to_string())
        })?;

    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
