//! Scorer - turns a validated feature vector into a prediction

use serde::Serialize;
use thiserror::Error;

use super::classifier::ClassifierError;
use super::features::{FeatureVector, ValidationError};
use super::provider::ModelHandle;
use crate::metrics::Metrics;

/// Confidence reported when the model has no probability output
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Outcome of scoring a single sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_class: usize,
    /// In `[0, 1]`
    pub confidence: f64,
}

/// Error kinds on the prediction path
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("internal scoring error: {0}")]
    Internal(String),
}

impl From<ClassifierError> for ScoreError {
    fn from(err: ClassifierError) -> Self {
        ScoreError::Internal(err.to_string())
    }
}

/// Score one sample against `handle`.
///
/// With a probabilistic model the confidence is the top class probability
/// and is observed on the confidence histogram. Otherwise it is
/// [`DEFAULT_CONFIDENCE`] and nothing is observed.
pub fn score(
    features: &FeatureVector,
    handle: Option<&ModelHandle>,
    metrics: &Metrics,
) -> Result<PredictionResult, ScoreError> {
    let handle = handle.ok_or(ScoreError::ModelUnavailable)?;
    let model = handle.model();
    let sample = features.to_sample();

    let labels = model.predict(sample.view())?;
    let predicted_class = labels
        .first()
        .copied()
        .ok_or_else(|| ScoreError::Internal("model returned no label".to_string()))?;

    let confidence = match model.as_probabilistic() {
        Some(proba_model) => {
            let proba = proba_model.predict_proba(sample.view())?;
            let top = proba
                .outer_iter()
                .next()
                .ok_or_else(|| ScoreError::Internal("model returned no probabilities".to_string()))?
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            if !(0.0..=1.0).contains(&top) {
                return Err(ScoreError::Internal(format!("probability {} outside [0, 1]", top)));
            }
            metrics.observe_confidence(top);
            top
        }
        None => DEFAULT_CONFIDENCE,
    };

    Ok(PredictionResult {
        predicted_class,
        confidence,
    })
}
