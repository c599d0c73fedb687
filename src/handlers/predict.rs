//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::inference::{score, FeatureVector, ScoreError};
use crate::models::{PredictionRequest, PredictionResponse};
use crate::{AppError, AppResult, AppState};

const ENDPOINT: &str = "predict";

/// Main prediction endpoint.
///
/// Latency is observed for every outcome; each request is counted once as
/// either success or error, including requests dropped mid-flight.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let mut tracker = state.metrics.track_request(ENDPOINT);

    let result = handle(&state, payload).await;
    if result.is_ok() {
        tracker.succeed();
    }

    result
}

async fn handle(
    state: &AppState,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::error!("Validation error: {}", rejection.body_text());
        AppError::from(rejection)
    })?;
    let request_id = req.request_id;

    let features = FeatureVector::new(&req.features).map_err(|e| {
        tracing::error!(request_id = request_id.as_deref(), "Validation error: {}", e);
        AppError::from(ScoreError::from(e))
    })?;

    let Some(model) = state.provider.current() else {
        tracing::warn!(request_id = request_id.as_deref(), "Prediction rejected: model not loaded");
        return Err(AppError::ModelUnavailable);
    };

    // CPU-bound; a panic inside the model surfaces as a join error
    let metrics = state.metrics.clone();
    let scoring_model = model.clone();
    let scored = tokio::task::spawn_blocking(move || score(&features, Some(scoring_model.as_ref()), &metrics))
        .await
        .unwrap_or_else(|e| Err(ScoreError::Internal(format!("scoring task failed: {}", e))));

    let result = match scored {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(request_id = request_id.as_deref(), "Prediction error: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        request_id = request_id.as_deref(),
        prediction = result.predicted_class,
        confidence = result.confidence,
        "Prediction successful"
    );

    Ok(Json(PredictionResponse::new(result, model.version(), request_id)))
}
