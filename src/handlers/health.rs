//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};

use crate::metrics::Outcome;
use crate::models::HealthResponse;
use crate::AppState;

/// Liveness: 200 whenever the process can answer, model or not
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    state.metrics.record_request("health", Outcome::Success);

    let handle = state.provider.current();
    let version = handle
        .as_ref()
        .map(|h| h.version())
        .unwrap_or(state.config.model_version.as_str());

    Json(HealthResponse::new("healthy", handle.is_some(), version))
}

/// Readiness: 200 only once a model is loaded
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.provider.current() {
        Some(handle) => {
            state.metrics.record_request("ready", Outcome::Success);
            (
                StatusCode::OK,
                Json(HealthResponse::new("ready", true, handle.version())),
            )
        }
        None => {
            state.metrics.record_request("ready", Outcome::Error);
            let mut body = HealthResponse::new("not_ready", false, &state.config.model_version);
            body.detail = Some("Model not loaded".to_string());
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
